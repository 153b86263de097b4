use core::hash::Hash;

use crate::Vec;

/// A scannable set of key switches, reporting the switches currently held.
pub trait KeySwitches<const SZ: usize, const RO: usize> {
    type Identifier: KeySwitchIdentifier<SZ>;

    fn scan(&mut self) -> Vec<Self::Identifier, RO>;
}

/// Identifies one switch position, convertible to `SZ` bytes so it can cross
/// the split link.
pub trait KeySwitchIdentifier<const SZ: usize>:
    Copy + Eq + From<[u8; SZ]> + Into<[u8; SZ]> + Hash
{
}
