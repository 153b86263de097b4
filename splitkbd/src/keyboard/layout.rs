use crate::keyboard::{Key, KeySwitchIdentifier, Layer};

pub use splitkbd_macros::layout;

/// Maps held switches to layers and switch positions to keys.
pub trait Layout<const SZ: usize> {
    type Identifier: KeySwitchIdentifier<SZ>;
    type Layer: Layer;

    /// Global layer implied by the currently held switches.
    fn layer(&self, switches: &[Self::Identifier]) -> Self::Layer;

    /// Key at `switch` on `layer`. May return [`Key::Transparent`] to defer
    /// to [`Layout::fallback`].
    fn key(&self, layer: Self::Layer, switch: &Self::Identifier) -> Key;

    /// Layer consulted when a lookup returns [`Key::Transparent`]. `None`
    /// leaves the entry unresolved and the switch is dropped.
    fn fallback(&self, layer: Self::Layer) -> Option<Self::Layer>;

    /// Applies a base-select command (`Key::Base0`..). Layouts with a single
    /// base layer can ignore this.
    fn select_base(&mut self, index: u8) {
        let _ = index;
    }
}
