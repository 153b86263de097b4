use super::{Key, Leds};

/// Delivers resolved keys to the host.
pub trait Reporter {
    type Error;

    fn is_ready(&self) -> bool;

    fn send(&mut self, keys: &[Key]) -> Result<(), Self::Error>;

    /// Keyboard LED state last pushed by the host.
    fn leds(&self) -> Leds {
        Leds::default()
    }
}
