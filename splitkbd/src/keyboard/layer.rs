pub use splitkbd_macros::Layer;

pub trait Layer: Copy + Eq + Default {
    /// Short human-readable name, shown on the status display.
    fn name(&self) -> &'static str;
}
