use embedded_hal_0_2::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
    timer::CountDown,
};
use splitkbd::{keyboard::KeySwitches, Vec};

use crate::{
    key_matrix::KeyMatrix, rotary_encoder::RotaryEncoder, switch_identifier::SwitchIdentifier,
};

/// One half's complete input set: the 4x5 key matrix plus its rotary
/// encoder.
pub struct Scanner<I, O, D, A, B, C: CountDown>
where
    C::Time: Copy,
{
    matrix: KeyMatrix<I, O, D, 4, 5>,
    encoder: RotaryEncoder<A, B, C>,
}

impl<I, O, D, A, B, C: CountDown> Scanner<I, O, D, A, B, C>
where
    C::Time: Copy,
{
    pub fn new(matrix: KeyMatrix<I, O, D, 4, 5>, encoder: RotaryEncoder<A, B, C>) -> Self {
        Scanner { matrix, encoder }
    }
}

impl<I: InputPin, O: OutputPin, D: DelayUs<u16>, A: InputPin, B: InputPin, C: CountDown>
    KeySwitches<2, 16> for Scanner<I, O, D, A, B, C>
where
    C::Time: Copy,
{
    type Identifier = SwitchIdentifier;

    fn scan(&mut self) -> Vec<SwitchIdentifier, 16> {
        let mut switches = self.matrix.scan::<16>();
        if let Some(detent) = self.encoder.scan() {
            switches.push(detent).ok();
        }
        switches
    }
}
