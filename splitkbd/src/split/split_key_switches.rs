use embedded_hal_0_2::timer::CountDown;
use heapless::Vec;

use crate::{
    keyboard::{KeySwitchIdentifier, KeySwitches},
    split::{Connection, SplitCommunicator, SplitState},
};

/// Wraps one half's switches and merges in the other half's over the split
/// link, tagging every identifier with its side.
pub struct SplitKeySwitches<
    const SZ: usize,
    const RO: usize,
    C: Connection,
    K: KeySwitches<SZ, RO>,
    T: CountDown,
> where
    T::Time: Copy,
{
    communicator: SplitCommunicator<SZ, RO, K::Identifier, C, T>,
    switches: Vec<K::Identifier, RO>,
    near: K,
    is_left: bool,
}

impl<const SZ: usize, const RO: usize, C: Connection, K: KeySwitches<SZ, RO>, T: CountDown>
    SplitKeySwitches<SZ, RO, C, K, T>
where
    T::Time: Copy,
{
    pub fn new(key_switches: K, connection: C, timer: T, timeout: T::Time, is_left: bool) -> Self {
        SplitKeySwitches {
            communicator: SplitCommunicator::new(connection, timer, timeout),
            switches: Vec::new(),
            near: key_switches,
            is_left,
        }
    }

    /// Feeds one incoming frame to the communicator. Call from the
    /// connection's receive interrupt.
    pub fn poll(&mut self) {
        self.communicator.respond(&self.switches);
    }

    pub fn state(&self) -> SplitState {
        self.communicator.state()
    }

    fn establish(&mut self) {
        if let Err(e) = self.communicator.establish() {
            defmt::warn!("Failed to establish split connection: {}", e);
        }
    }

    fn scan_both_sides(&mut self) -> Vec<SplitKeySwitchIdentifier<SZ, K::Identifier>, RO> {
        // The left half carries USB and initiates the handshake.
        if self.is_left && self.communicator.state() == SplitState::Undetermined {
            self.establish();
        }
        self.switches = self.near.scan();
        let far = self.communicator.request(&self.switches);

        let left: fn(K::Identifier) -> SplitKeySwitchIdentifier<SZ, K::Identifier> =
            SplitKeySwitchIdentifier::Left;
        let right: fn(K::Identifier) -> SplitKeySwitchIdentifier<SZ, K::Identifier> =
            SplitKeySwitchIdentifier::Right;
        let (near_side, far_side) = if self.is_left { (left, right) } else { (right, left) };

        self.switches
            .iter()
            .cloned()
            .map(near_side)
            .chain(far.iter().cloned().map(far_side))
            .take(RO)
            .collect()
    }
}

/// A switch identifier tagged with the half it lives on. Crosses the link as
/// one side byte followed by the underlying identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitKeySwitchIdentifier<const SZ: usize, I: KeySwitchIdentifier<SZ>> {
    Left(I),
    Right(I),
}

macro_rules! impl_split_key_switches {
    ( $sz:literal ) => {
        impl<I: KeySwitchIdentifier<$sz>> From<[u8; $sz + 1]> for SplitKeySwitchIdentifier<$sz, I> {
            fn from(value: [u8; $sz + 1]) -> Self {
                match value.split_first().unwrap() {
                    (&0, rest) => SplitKeySwitchIdentifier::Left(I::from(
                        <[u8; $sz]>::try_from(rest).unwrap(),
                    )),
                    (&1, rest) => SplitKeySwitchIdentifier::Right(I::from(
                        <[u8; $sz]>::try_from(rest).unwrap(),
                    )),
                    _ => panic!("corrupt split identifier"),
                }
            }
        }

        impl<I: KeySwitchIdentifier<$sz>> From<SplitKeySwitchIdentifier<$sz, I>>
            for [u8; $sz + 1]
        {
            fn from(value: SplitKeySwitchIdentifier<$sz, I>) -> Self {
                let mut bytes = [0u8; $sz + 1];
                let (side, rest) = bytes.split_first_mut().unwrap();
                match value {
                    SplitKeySwitchIdentifier::Left(inner) => {
                        *side = 0;
                        rest.copy_from_slice(&inner.into());
                    }
                    SplitKeySwitchIdentifier::Right(inner) => {
                        *side = 1;
                        rest.copy_from_slice(&inner.into());
                    }
                }
                bytes
            }
        }

        impl<I: KeySwitchIdentifier<$sz>> KeySwitchIdentifier<{ $sz + 1 }>
            for SplitKeySwitchIdentifier<$sz, I>
        {
        }

        impl<const RO: usize, C: Connection, K: KeySwitches<$sz, RO>, T: CountDown>
            KeySwitches<{ $sz + 1 }, RO> for SplitKeySwitches<$sz, RO, C, K, T>
        where
            T::Time: Copy,
        {
            type Identifier = SplitKeySwitchIdentifier<$sz, K::Identifier>;

            fn scan(&mut self) -> Vec<Self::Identifier, RO> {
                self.scan_both_sides()
            }
        }
    };
}

impl_split_key_switches!(1);
impl_split_key_switches!(2);
impl_split_key_switches!(3);
impl_split_key_switches!(4);
