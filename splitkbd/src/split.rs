mod connection;
mod error;
mod message;
mod split_communicator;
mod split_key_switches;
mod split_state;

pub use connection::{Connection, ConnectionExt};
pub use error::Error;
pub use message::Message;
pub use split_communicator::SplitCommunicator;
pub use split_key_switches::{SplitKeySwitchIdentifier, SplitKeySwitches};
pub use split_state::SplitState;
