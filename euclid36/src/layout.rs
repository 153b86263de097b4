use splitkbd::{
    keyboard::{self, layout, Key},
    split::SplitKeySwitchIdentifier,
};

use crate::switch_identifier::SwitchIdentifier;

/// Thumb switches that act as layer holds.
const NAVIGATION_HOLD: (u8, u8) = (3, 4); // left half
const FUNCTION_HOLD: (u8, u8) = (3, 0); // right half
const SYMBOLS_HOLD: (u8, u8) = (3, 2); // right half

#[derive(Debug, Clone, Copy, PartialEq, Eq, keyboard::Layer)]
pub enum Layer {
    Qwerty,
    Colemak,
    Workman,
    Navigation,
    Symbols,
    Function,
    Media,
    Mouse,
    WinNav,
}

impl Default for Layer {
    fn default() -> Self {
        Self::Qwerty
    }
}

/// The euclid36 keymap. Three selectable base layers, three held thumb
/// layers, and three two-thumb combination layers.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    base: Layer,
}

impl Layout {
    const QWERTY_LEFT: [[Key; 5]; 4] = layout! {r"
        |  Q  |  W  |  E  |  R  |  T  |
        |  A  |  S  |  D  |  F  |  G  |
        |  Z  |  X  |  C  |  V  |  B  |
        |MMute| LCtl |LSft |Enter|     |
    "};
    const QWERTY_RIGHT: [[Key; 5]; 4] = layout! {r"
        |  Y  |  U  |  I  |  O  |  P  |
        |  H  |  J  |  K  |  L  |  ;  |
        |  N  |  M  |  ,  |  .  |  /  |
        |     |Space|     |RSft |C-Bspc|
    "};

    const COLEMAK_LEFT: [[Key; 5]; 4] = layout! {r"
        |  Q  |  W  |  F  |  P  |  B  |
        |  A  |  R  |  S  |  T  |  G  |
        |  Z  |  X  |  C  |  D  |  V  |
        |MMute| LCtl |LSft |Enter|     |
    "};
    const COLEMAK_RIGHT: [[Key; 5]; 4] = layout! {r"
        |  J  |  L  |  U  |  Y  |  ;  |
        |  M  |  N  |  E  |  I  |  O  |
        |  K  |  H  |  ,  |  .  |  /  |
        |     |Space|     |RSft |C-Bspc|
    "};

    const WORKMAN_LEFT: [[Key; 5]; 4] = layout! {r"
        |  Q  |  D  |  R  |  W  |  B  |
        |  A  |  S  |  H  |  T  |  G  |
        |  Z  |  X  |  M  |  C  |  V  |
        |MMute| LCtl |LSft |Enter|     |
    "};
    const WORKMAN_RIGHT: [[Key; 5]; 4] = layout! {r"
        |  J  |  F  |  U  |  P  |  ;  |
        |  Y  |  N  |  E  |  O  |  I  |
        |  K  |  L  |  ,  |  .  |  /  |
        |     |Space|     |RSft |C-Bspc|
    "};

    const NAVIGATION_LEFT: [[Key; 5]; 4] = layout! {r"
        | Esc | Home | Up  | End  | PgUp |
        | Tab | Left | Down | Right | PgDn |
        |Caps | LGui | LAlt | Bspc | Del  |
        | Trn | Trn | Trn | Trn |     |
    "};
    const NAVIGATION_RIGHT: [[Key; 5]; 4] = layout! {r"
        |  *  |  7  |  8  |  9  |  +  |
        |  .  |  4  |  5  |  6  |  -  |
        |  0  |  1  |  2  |  3  |  =  |
        |     | Trn |     | Trn | Trn |
    "};

    const SYMBOLS_LEFT: [[Key; 5]; 4] = layout! {r"
        |  !  |  @  |  #  |  $  |  %  |
        |  `  |  ~  |  -  |  _  |Pipe |
        |  \  |  :  |  <  |  >  |  ?  |
        | Trn | Trn | Trn | Trn |     |
    "};
    const SYMBOLS_RIGHT: [[Key; 5]; 4] = layout! {r#"
        |  ^  |  &  |  *  |  (  |  )  |
        |  =  |  +  |  [  |  ]  |  '  |
        | Trn |  {  |  }  |  "  | Trn |
        |     | Trn |     | Trn | Trn |
    "#};

    const FUNCTION_LEFT: [[Key; 5]; 4] = layout! {r"
        | Trn |S-Home| S-Up |S-End |S-PgUp|
        | Trn |S-Left|S-Down|S-Right|S-PgDn|
        | Trn | LGui | LAlt | Bspc | Ins |
        | Trn | Trn | Trn | Trn |     |
    "};
    const FUNCTION_RIGHT: [[Key; 5]; 4] = layout! {r"
        | F12 | F7 | F8 | F9 |PrScr|
        | F11 | F4 | F5 | F6 |ScLck|
        | F10 | F1 | F2 | F3 |Pause|
        |     | Trn |     | Trn | Trn |
    "};

    const MEDIA_LEFT: [[Key; 5]; 4] = layout! {r"
        |MPrev|MPlPs|MNext|MVlUp|MMute|
        |     |     |MStop|MVlDn|     |
        |     |     |     |     |     |
        | Trn | Trn | Trn | Trn |     |
    "};
    const MEDIA_RIGHT: [[Key; 5]; 4] = layout! {r"
        |Base0|Base1|Base2|     |     |
        |     |     |     |     |     |
        |     |     |     |     |     |
        |     | Trn |     | Trn | Trn |
    "};

    const MOUSE_LEFT: [[Key; 5]; 4] = layout! {r"
        |     |     |MsUp |     |WhUp |
        |     |MsLt |MsDn |MsRt |WhDn |
        |     |     |     |     |     |
        | Trn | Trn | Trn | Trn |     |
    "};
    const MOUSE_RIGHT: [[Key; 5]; 4] = layout! {r"
        |     |Btn1 |Btn2 |Btn3 |     |
        |     |     |     |     |     |
        |     |     |     |     |     |
        |     | Trn |     | Trn | Trn |
    "};

    const WINNAV_LEFT: [[Key; 5]; 4] = layout! {r"
        | G-1 | G-2 | G-3 | G-4 | G-5 |
        |A-Tab|G-Left|G-Down|G-Up |G-Right|
        |     |     |     |     |     |
        | Trn | Trn | Trn | Trn |     |
    "};
    const WINNAV_RIGHT: [[Key; 5]; 4] = layout! {r"
        |     |     |     |     |     |
        |     |     |     |     |     |
        |     |     |     |     |     |
        |     | Trn |     | Trn | Trn |
    "};

    fn tables(layer: Layer) -> (&'static [[Key; 5]; 4], &'static [[Key; 5]; 4]) {
        match layer {
            Layer::Qwerty => (&Self::QWERTY_LEFT, &Self::QWERTY_RIGHT),
            Layer::Colemak => (&Self::COLEMAK_LEFT, &Self::COLEMAK_RIGHT),
            Layer::Workman => (&Self::WORKMAN_LEFT, &Self::WORKMAN_RIGHT),
            Layer::Navigation => (&Self::NAVIGATION_LEFT, &Self::NAVIGATION_RIGHT),
            Layer::Symbols => (&Self::SYMBOLS_LEFT, &Self::SYMBOLS_RIGHT),
            Layer::Function => (&Self::FUNCTION_LEFT, &Self::FUNCTION_RIGHT),
            Layer::Media => (&Self::MEDIA_LEFT, &Self::MEDIA_RIGHT),
            Layer::Mouse => (&Self::MOUSE_LEFT, &Self::MOUSE_RIGHT),
            Layer::WinNav => (&Self::WINNAV_LEFT, &Self::WINNAV_RIGHT),
        }
    }
}

impl keyboard::Layout<3> for Layout {
    type Identifier = SplitKeySwitchIdentifier<2, SwitchIdentifier>;
    type Layer = Layer;

    fn layer(&self, switches: &[Self::Identifier]) -> Layer {
        let mut navigation = false;
        let mut symbols = false;
        let mut function = false;
        for switch in switches {
            match switch {
                SplitKeySwitchIdentifier::Left(SwitchIdentifier::Key { row, col })
                    if (*row, *col) == NAVIGATION_HOLD =>
                {
                    navigation = true
                }
                SplitKeySwitchIdentifier::Right(SwitchIdentifier::Key { row, col })
                    if (*row, *col) == FUNCTION_HOLD =>
                {
                    function = true
                }
                SplitKeySwitchIdentifier::Right(SwitchIdentifier::Key { row, col })
                    if (*row, *col) == SYMBOLS_HOLD =>
                {
                    symbols = true
                }
                _ => {}
            }
        }
        match (navigation, symbols, function) {
            (true, true, _) => Layer::Media,
            (true, _, true) => Layer::Mouse,
            (_, true, true) => Layer::WinNav,
            (true, false, false) => Layer::Navigation,
            (false, true, false) => Layer::Symbols,
            (false, false, true) => Layer::Function,
            (false, false, false) => self.base,
        }
    }

    fn key(&self, layer: Layer, switch: &Self::Identifier) -> Key {
        match *switch {
            SplitKeySwitchIdentifier::Left(SwitchIdentifier::Key { row, col }) => {
                Self::tables(layer).0[row as usize][col as usize]
            }
            SplitKeySwitchIdentifier::Right(SwitchIdentifier::Key { row, col }) => {
                Self::tables(layer).1[row as usize][col as usize]
            }
            SplitKeySwitchIdentifier::Left(SwitchIdentifier::Encoder { index, clockwise })
            | SplitKeySwitchIdentifier::Right(SwitchIdentifier::Encoder { index, clockwise }) => {
                encoder_key(index, clockwise)
            }
        }
    }

    fn fallback(&self, layer: Layer) -> Option<Layer> {
        match layer {
            Layer::Qwerty | Layer::Colemak | Layer::Workman => None,
            _ => Some(self.base),
        }
    }

    fn select_base(&mut self, index: u8) {
        self.base = match index {
            0 => Layer::Qwerty,
            1 => Layer::Colemak,
            2 => Layer::Workman,
            _ => return,
        };
    }
}

/// Encoder mapping, deliberately layer-independent: the left encoder drives
/// volume, the right one moves the caret a word at a time.
fn encoder_key(index: u8, clockwise: bool) -> Key {
    match (index, clockwise) {
        (0, true) => Key::MediaVolumeUp,
        (0, false) => Key::MediaVolumeDown,
        (1, true) => Key::CtrlLeft,
        (1, false) => Key::CtrlRight,
        _ => Key::None,
    }
}

#[cfg(test)]
mod tests {
    use splitkbd::keyboard::Layout as _;

    use super::*;

    fn left(row: u8, col: u8) -> SplitKeySwitchIdentifier<2, SwitchIdentifier> {
        SplitKeySwitchIdentifier::Left(SwitchIdentifier::Key { row, col })
    }

    fn right(row: u8, col: u8) -> SplitKeySwitchIdentifier<2, SwitchIdentifier> {
        SplitKeySwitchIdentifier::Right(SwitchIdentifier::Key { row, col })
    }

    #[test]
    fn qwerty_is_the_default_base() {
        let layout = Layout::default();
        assert_eq!(layout.layer(&[]), Layer::Qwerty);
        assert_eq!(layout.key(Layer::Qwerty, &left(0, 0)), Key::Q);
        assert_eq!(layout.key(Layer::Qwerty, &right(1, 4)), Key::Semicolon);
    }

    #[test]
    fn thumb_holds_select_their_layers() {
        let layout = Layout::default();
        assert_eq!(layout.layer(&[left(3, 4)]), Layer::Navigation);
        assert_eq!(layout.layer(&[right(3, 2)]), Layer::Symbols);
        assert_eq!(layout.layer(&[right(3, 0)]), Layer::Function);
    }

    #[test]
    fn thumb_combinations_select_the_upper_layers() {
        let layout = Layout::default();
        assert_eq!(layout.layer(&[left(3, 4), right(3, 2)]), Layer::Media);
        assert_eq!(layout.layer(&[left(3, 4), right(3, 0)]), Layer::Mouse);
        assert_eq!(layout.layer(&[right(3, 2), right(3, 0)]), Layer::WinNav);
    }

    #[test]
    fn layer_holds_produce_no_keys_of_their_own() {
        let layout = Layout::default();
        assert_eq!(layout.key(Layer::Qwerty, &left(3, 4)), Key::None);
        assert_eq!(layout.key(Layer::Navigation, &right(3, 0)), Key::None);
        assert_eq!(layout.key(Layer::Media, &right(3, 2)), Key::None);
    }

    #[test]
    fn base_selection_switches_the_letter_tables() {
        let mut layout = Layout::default();
        layout.select_base(1);
        assert_eq!(layout.layer(&[]), Layer::Colemak);
        assert_eq!(layout.key(Layer::Colemak, &left(0, 2)), Key::F);

        layout.select_base(2);
        assert_eq!(layout.layer(&[]), Layer::Workman);
        assert_eq!(layout.key(Layer::Workman, &left(0, 1)), Key::D);

        // Out-of-range selections leave the base untouched.
        layout.select_base(7);
        assert_eq!(layout.layer(&[]), Layer::Workman);
    }

    #[test]
    fn overlays_fall_back_to_the_active_base() {
        let mut layout = Layout::default();
        assert_eq!(layout.fallback(Layer::Navigation), Some(Layer::Qwerty));
        assert_eq!(layout.fallback(Layer::Media), Some(Layer::Qwerty));
        assert_eq!(layout.fallback(Layer::Qwerty), None);

        layout.select_base(2);
        assert_eq!(layout.fallback(Layer::Symbols), Some(Layer::Workman));
        assert_eq!(layout.fallback(Layer::Workman), None);
    }

    #[test]
    fn overlay_thumbs_are_transparent_over_the_base() {
        let layout = Layout::default();
        // Space keeps working while Navigation is held.
        assert_eq!(layout.key(Layer::Navigation, &right(3, 1)), Key::Transparent);
        assert_eq!(layout.key(Layer::Qwerty, &right(3, 1)), Key::Space);
    }

    #[test]
    fn media_layer_carries_the_base_select_keys() {
        let layout = Layout::default();
        assert_eq!(layout.key(Layer::Media, &right(0, 0)), Key::Base0);
        assert_eq!(layout.key(Layer::Media, &right(0, 1)), Key::Base1);
        assert_eq!(layout.key(Layer::Media, &right(0, 2)), Key::Base2);
    }

    #[test]
    fn encoders_ignore_the_active_layer() {
        let layout = Layout::default();
        let volume = SplitKeySwitchIdentifier::Left(SwitchIdentifier::Encoder {
            index: 0,
            clockwise: true,
        });
        assert_eq!(layout.key(Layer::Qwerty, &volume), Key::MediaVolumeUp);
        assert_eq!(layout.key(Layer::Media, &volume), Key::MediaVolumeUp);

        let caret = SplitKeySwitchIdentifier::Right(SwitchIdentifier::Encoder {
            index: 1,
            clockwise: false,
        });
        assert_eq!(layout.key(Layer::Function, &caret), Key::CtrlRight);
    }

    #[test]
    fn clockwise_right_encoder_jumps_a_word_back() {
        // Matches the original handler: clockwise is Ctrl+Left.
        assert_eq!(encoder_key(1, true), Key::CtrlLeft);
        assert_eq!(encoder_key(1, false), Key::CtrlRight);
        assert_eq!(encoder_key(0, true), Key::MediaVolumeUp);
        assert_eq!(encoder_key(3, true), Key::None);
    }

    #[test]
    fn numpad_lives_on_the_navigation_right_hand() {
        let layout = Layout::default();
        assert_eq!(layout.key(Layer::Navigation, &right(2, 1)), Key::Num1);
        assert_eq!(layout.key(Layer::Navigation, &right(0, 2)), Key::Num8);
        assert_eq!(layout.key(Layer::Navigation, &right(0, 4)), Key::Plus);
    }
}
