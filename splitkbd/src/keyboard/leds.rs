use defmt::Format;

/// Host-driven keyboard LED state, taken from the HID LED output report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Format)]
pub struct Leds {
    pub num_lock: bool,
    pub caps_lock: bool,
    pub scroll_lock: bool,
}

impl From<u8> for Leds {
    fn from(bits: u8) -> Self {
        Leds {
            num_lock: bits & 0x01 != 0,
            caps_lock: bits & 0x02 != 0,
            scroll_lock: bits & 0x04 != 0,
        }
    }
}
