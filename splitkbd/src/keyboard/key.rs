use defmt::Format;

/// A logical key, encoded in sixteen bits.
///
/// The low planes mirror the HID keyboard usage page directly: plain usages
/// from `0x0004`, modifiers at `0xe0..=0xe7`. On top of those the encoding
/// packs a few more planes:
///
/// * `0xMMUU` with `MM` in `0xe0..=0xe7`: a chord of one modifier and one
///   usage, reported together (shifted symbols, Ctrl/Alt/Gui shortcuts)
/// * `0x1UUU`: consumer-page usages (media transport and volume)
/// * `0x2xxx`: mouse buttons and movement, translated into mouse reports
/// * `0xf00x`: base-select commands, consumed by the controller and never
///   reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
#[repr(u16)]
pub enum Key {
    None = 0x0000,
    Transparent = 0x0001,
    A = 0x0004,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Num0,
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    Backslash,
    NonUsHash,
    Semicolon,
    Quote,
    Grave,
    Comma,
    Period,
    Slash,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    PrintScreen,
    ScrollLock,
    Pause,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    Right,
    Left,
    Down,
    Up,
    LeftControl = 0x00e0,
    LeftShift,
    LeftAlt,
    LeftGui,
    RightControl,
    RightShift,
    RightAlt,
    RightGui,
    // Consumer page (media) usages in the 0x1000 plane.
    MediaNextTrack = 0x10b5,
    MediaPrevTrack = 0x10b6,
    MediaStop = 0x10b7,
    MediaPlayPause = 0x10cd,
    MediaMute = 0x10e2,
    MediaVolumeUp = 0x10e9,
    MediaVolumeDown = 0x10ea,
    // Mouse plane. Buttons carry their report bitmask in the low byte.
    MouseButton1 = 0x2001,
    MouseButton2 = 0x2002,
    MouseButton3 = 0x2004,
    MouseUp = 0x2011,
    MouseDown = 0x2012,
    MouseLeft = 0x2013,
    MouseRight = 0x2014,
    MouseWheelUp = 0x2015,
    MouseWheelDown = 0x2016,
    // Ctrl chords.
    CtrlBackspace = 0xe02a,
    CtrlRight = 0xe04f,
    CtrlLeft = 0xe050,
    // Shift chords: symbols first, then navigation.
    Exclamation = 0xe11e,
    At = 0xe11f,
    Hash = 0xe120,
    Dollar = 0xe121,
    Percent = 0xe122,
    Caret = 0xe123,
    Ampersand = 0xe124,
    Asterisk = 0xe125,
    LeftParen = 0xe126,
    RightParen = 0xe127,
    Underscore = 0xe12d,
    Plus = 0xe12e,
    LeftBrace = 0xe12f,
    RightBrace = 0xe130,
    Pipe = 0xe131,
    Colon = 0xe133,
    DoubleQuote = 0xe134,
    Tilde = 0xe135,
    LessThan = 0xe136,
    GreaterThan = 0xe137,
    Question = 0xe138,
    ShiftHome = 0xe14a,
    ShiftPageUp = 0xe14b,
    ShiftEnd = 0xe14d,
    ShiftPageDown = 0xe14e,
    ShiftRight = 0xe14f,
    ShiftLeft = 0xe150,
    ShiftDown = 0xe151,
    ShiftUp = 0xe152,
    // Alt chords.
    AltTab = 0xe22b,
    // Gui chords.
    GuiDigit1 = 0xe31e,
    GuiDigit2 = 0xe31f,
    GuiDigit3 = 0xe320,
    GuiDigit4 = 0xe321,
    GuiDigit5 = 0xe322,
    GuiRight = 0xe34f,
    GuiLeft = 0xe350,
    GuiDown = 0xe351,
    GuiUp = 0xe352,
    // Base-select commands, see `Layout::select_base`.
    Base0 = 0xf000,
    Base1 = 0xf001,
    Base2 = 0xf002,
    Base3 = 0xf003,
}

impl Key {
    pub fn is_noop(&self) -> bool {
        *self as u16 <= 0x0001
    }

    pub fn is_modifier_key(&self) -> bool {
        (*self as u16) >= 0x00e0 && (*self as u16) <= 0x00e7
    }

    /// A modifier+usage chord such as [`Key::Exclamation`] or [`Key::CtrlLeft`].
    pub fn is_modified_key(&self) -> bool {
        (*self as u16 >> 8) >= 0x00e0
            && (*self as u16 >> 8) <= 0x00e7
            && (*self as u16 & 0xff) >= 0x0004
            && (*self as u16 & 0xff) < 0x00e0
    }

    pub fn is_keyboard_key(&self) -> bool {
        *self as u16 >= 0x0004 && (*self as u16) < 0x00e0
    }

    /// HID keyboard-page usage id, for keys that report one.
    pub fn key_code(&self) -> Option<u8> {
        if self.is_modified_key() || self.is_keyboard_key() {
            Some((*self as u16 & 0xff) as u8)
        } else {
            None
        }
    }

    pub fn is_media_key(&self) -> bool {
        (*self as u16) >= 0x1000 && (*self as u16) < 0x2000
    }

    pub fn is_mouse_key(&self) -> bool {
        (*self as u16) >= 0x2000 && (*self as u16) < 0x3000
    }

    pub fn is_base_select(&self) -> bool {
        (*self as u16) >= 0xf000
    }

    /// Index carried by a base-select command key.
    pub fn base_index(&self) -> Option<u8> {
        if self.is_base_select() {
            Some((*self as u16 & 0x0f) as u8)
        } else {
            None
        }
    }

    pub(crate) fn modifier_key_flag(&self) -> u8 {
        if self.is_modifier_key() {
            1 << ((*self as u16) - 0x00e0)
        } else if self.is_modified_key() {
            1 << ((*self as u16 >> 8) - 0x00e0)
        } else {
            0x00
        }
    }

    pub(crate) fn media_usage_id(&self) -> u16 {
        if self.is_media_key() {
            (*self as u16) & 0x0fff
        } else {
            0x0000
        }
    }

    pub(crate) fn mouse_button_mask(&self) -> u8 {
        if (*self as u16) >= 0x2001 && (*self as u16) <= 0x2007 {
            (*self as u16 & 0x07) as u8
        } else {
            0x00
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn plain_keys_report_their_usage() {
        assert_eq!(Key::A.key_code(), Some(0x04));
        assert_eq!(Key::Space.key_code(), Some(0x2c));
        assert!(Key::A.is_keyboard_key());
        assert!(!Key::A.is_modified_key());
        assert_eq!(Key::A.modifier_key_flag(), 0x00);
    }

    #[test]
    fn modifiers_fold_into_flags() {
        assert_eq!(Key::LeftControl.modifier_key_flag(), 0x01);
        assert_eq!(Key::LeftShift.modifier_key_flag(), 0x02);
        assert_eq!(Key::RightGui.modifier_key_flag(), 0x80);
        assert_eq!(Key::LeftShift.key_code(), None);
    }

    #[test]
    fn chords_carry_modifier_and_usage() {
        assert!(Key::Exclamation.is_modified_key());
        assert_eq!(Key::Exclamation.modifier_key_flag(), 0x02);
        assert_eq!(Key::Exclamation.key_code(), Some(0x1e));
        assert_eq!(Key::CtrlLeft.modifier_key_flag(), 0x01);
        assert_eq!(Key::CtrlLeft.key_code(), Some(0x50));
        assert_eq!(Key::GuiUp.modifier_key_flag(), 0x08);
    }

    #[test]
    fn media_keys_stay_off_the_keyboard_report() {
        assert!(Key::MediaVolumeUp.is_media_key());
        assert_eq!(Key::MediaVolumeUp.key_code(), None);
        assert_eq!(Key::MediaVolumeUp.media_usage_id(), 0x00e9);
        assert_eq!(Key::A.media_usage_id(), 0x0000);
    }

    #[test]
    fn mouse_buttons_carry_their_mask() {
        assert_eq!(Key::MouseButton1.mouse_button_mask(), 0x01);
        assert_eq!(Key::MouseButton3.mouse_button_mask(), 0x04);
        assert_eq!(Key::MouseUp.mouse_button_mask(), 0x00);
        assert!(Key::MouseWheelDown.is_mouse_key());
    }

    #[test]
    fn base_select_commands_expose_their_index() {
        assert_eq!(Key::Base0.base_index(), Some(0));
        assert_eq!(Key::Base2.base_index(), Some(2));
        assert_eq!(Key::A.base_index(), None);
        assert!(Key::Base1.is_base_select());
        assert_eq!(Key::Base1.key_code(), None);
    }

    #[test]
    fn noops_are_dropped_markers() {
        assert!(Key::None.is_noop());
        assert!(Key::Transparent.is_noop());
        assert!(!Key::A.is_noop());
    }
}
