mod controller;
mod key;
mod key_switches;
mod keyboard_state;
mod layer;
mod layout;
mod leds;
mod reporter;

pub use controller::Controller;
pub use key::Key;
pub use key_switches::{KeySwitchIdentifier, KeySwitches};
pub use keyboard_state::KeyboardState;
pub use layer::Layer;
pub use layout::{layout, Layout};
pub use leds::Leds;
pub use reporter::Reporter;
