use core::fmt::Debug;

use defmt::Format;

#[derive(Debug, Format)]
pub enum Error<E: 'static + Debug> {
    ReadTimedOut,
    TooManySwitches,
    Read {
        #[defmt(Debug2Format)]
        source: E,
    },
    UnknownHead {
        head: u8,
    },
}
