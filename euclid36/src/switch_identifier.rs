use splitkbd::keyboard;

/// One input event source on one half: a matrix position, or a rotary
/// encoder detent carried through the scan path as a virtual switch.
///
/// Encoder identifiers are tagged with a high byte no matrix row can reach,
/// so both kinds share the two-byte wire form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwitchIdentifier {
    Key { row: u8, col: u8 },
    Encoder { index: u8, clockwise: bool },
}

const ENCODER_TAG: u8 = 0xe0;

impl From<[u8; 2]> for SwitchIdentifier {
    fn from(value: [u8; 2]) -> Self {
        if value[0] & ENCODER_TAG == ENCODER_TAG {
            SwitchIdentifier::Encoder {
                index: value[0] & !ENCODER_TAG,
                clockwise: value[1] != 0,
            }
        } else {
            SwitchIdentifier::Key {
                row: value[0],
                col: value[1],
            }
        }
    }
}

impl From<SwitchIdentifier> for [u8; 2] {
    fn from(value: SwitchIdentifier) -> Self {
        match value {
            SwitchIdentifier::Key { row, col } => [row, col],
            SwitchIdentifier::Encoder { index, clockwise } => {
                [ENCODER_TAG | index, clockwise as u8]
            }
        }
    }
}

impl keyboard::KeySwitchIdentifier<2> for SwitchIdentifier {}
