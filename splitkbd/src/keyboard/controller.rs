use heapless::{FnvIndexMap, Vec};

use super::{Key, KeySwitchIdentifier, KeySwitches, KeyboardState, Layer, Layout, Reporter};

/// Ties the scan, layout and report stages together. Boards run
/// [`Controller::main_loop`] continuously and [`Controller::send_keys`] on a
/// fixed report tick.
pub struct Controller<
    const SZ: usize,
    const RO: usize,
    R: Reporter,
    K: KeySwitches<SZ, RO>,
    L: Layout<SZ, Identifier = K::Identifier>,
> {
    pub reporter: R,
    pub key_switches: K,
    layout: L,
    layer: L::Layer,
    keys: Vec<Key, RO>,
    pressed_switches: FnvIndexMap<K::Identifier, L::Layer, 16>,
    held_commands: Vec<Key, 4>,
}

impl<
        const SZ: usize,
        const RO: usize,
        R: Reporter,
        K: KeySwitches<SZ, RO>,
        L: Layout<SZ, Identifier = K::Identifier>,
    > Controller<SZ, RO, R, K, L>
{
    pub fn new(reporter: R, key_switches: K, layout: L) -> Self {
        Controller {
            reporter,
            key_switches,
            layout,
            layer: L::Layer::default(),
            keys: Vec::new(),
            pressed_switches: FnvIndexMap::new(),
            held_commands: Vec::new(),
        }
    }

    pub fn get_state(&self) -> KeyboardState<L::Layer, RO> {
        KeyboardState {
            layer: self.layer,
            keys: self.keys.clone(),
            leds: self.reporter.leds(),
        }
    }

    pub fn main_loop(&mut self) {
        let switches = self.key_switches.scan();

        let global_layer = self.layout.layer(&switches);

        // A switch keeps the layer it was pressed on until released.
        let switches_and_layers: Vec<_, RO> =
            latch_layers(&self.pressed_switches, &switches, global_layer);

        let keys = resolve_keys(&self.layout, &switches_and_layers);
        let (keys, held_commands) =
            apply_base_commands(&mut self.layout, &self.held_commands, keys);
        let keys = suppress_phantom_chords(keys);

        if !keys.is_empty() {
            defmt::debug!("{}", keys.as_slice());
        }

        self.pressed_switches = switches_and_layers
            .into_iter()
            .map(|(s, l)| (*s, l))
            .collect();
        self.layer = global_layer;
        self.held_commands = held_commands;
        self.keys = keys;
    }

    pub fn send_keys(&mut self) -> Result<(), R::Error> {
        if !self.reporter.is_ready() {
            return Ok(());
        }

        self.reporter.send(&self.keys)
    }
}

fn latch_layers<
    'a,
    Y: Layer,
    SI: KeySwitchIdentifier<SZ>,
    const SZ: usize,
    const RO: usize,
    const N: usize,
>(
    pressed_switches: &FnvIndexMap<SI, Y, N>,
    switches: &'a [SI],
    global_layer: Y,
) -> Vec<(&'a SI, Y), RO> {
    switches
        .iter()
        .map(|s| {
            let layer = if let Some(layer) = pressed_switches.get(s) {
                *layer
            } else {
                global_layer
            };
            (s, layer)
        })
        .collect()
}

fn resolve_keys<L: Layout<SZ>, const SZ: usize, const RO: usize>(
    layout: &L,
    switches_and_layers: &[(&L::Identifier, L::Layer)],
) -> Vec<Key, RO> {
    switches_and_layers
        .iter()
        .map(|&(switch, mut layer)| {
            let mut key = layout.key(layer, switch);
            while key == Key::Transparent {
                let Some(below) = layout.fallback(layer) else {
                    break;
                };
                assert!(below != layer, "Layout::fallback must descend");
                layer = below;
                key = layout.key(layer, switch);
            }
            key
        })
        .filter(|key| !key.is_noop())
        .collect()
}

/// Strips base-select commands from the key set, forwarding newly pressed
/// ones to the layout. Returns the remaining keys and the commands still held.
fn apply_base_commands<L: Layout<SZ>, const SZ: usize, const RO: usize>(
    layout: &mut L,
    previously_held: &Vec<Key, 4>,
    mut keys: Vec<Key, RO>,
) -> (Vec<Key, RO>, Vec<Key, 4>) {
    let held: Vec<Key, 4> = keys.iter().filter(|k| k.is_base_select()).copied().collect();
    for command in &held {
        if !previously_held.contains(command) {
            if let Some(index) = command.base_index() {
                layout.select_base(index);
            }
        }
    }
    keys.retain(|k| !k.is_base_select());
    (keys, held)
}

fn suppress_phantom_chords<const RO: usize>(mut keys: Vec<Key, RO>) -> Vec<Key, RO> {
    // A chord's modifier must not leak into plain keys pressed alongside it.
    if keys.iter().any(|k| !k.is_modified_key()) {
        keys.retain(|k| !k.is_modified_key());
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Layout as LayoutTrait;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Id(u8);

    impl From<[u8; 1]> for Id {
        fn from(value: [u8; 1]) -> Self {
            Id(value[0])
        }
    }

    impl From<Id> for [u8; 1] {
        fn from(value: Id) -> Self {
            [value.0]
        }
    }

    impl crate::keyboard::KeySwitchIdentifier<1> for Id {}

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    enum TestLayer {
        #[default]
        Base,
        Overlay,
    }

    impl Layer for TestLayer {
        fn name(&self) -> &'static str {
            match self {
                TestLayer::Base => "Base",
                TestLayer::Overlay => "Overlay",
            }
        }
    }

    #[derive(Default)]
    struct TestLayout {
        base_index: u8,
    }

    impl LayoutTrait<1> for TestLayout {
        type Identifier = Id;
        type Layer = TestLayer;

        fn layer(&self, switches: &[Id]) -> TestLayer {
            if switches.contains(&Id(9)) {
                TestLayer::Overlay
            } else {
                TestLayer::Base
            }
        }

        fn key(&self, layer: TestLayer, switch: &Id) -> Key {
            match (layer, switch.0) {
                (TestLayer::Base, 0) => {
                    if self.base_index == 0 {
                        Key::A
                    } else {
                        Key::C
                    }
                }
                (TestLayer::Base, 1) => Key::B,
                (TestLayer::Base, 2) => Key::Base1,
                (TestLayer::Overlay, 0) => Key::Num1,
                (TestLayer::Overlay, 1) => Key::Transparent,
                _ => Key::None,
            }
        }

        fn fallback(&self, layer: TestLayer) -> Option<TestLayer> {
            match layer {
                TestLayer::Base => None,
                TestLayer::Overlay => Some(TestLayer::Base),
            }
        }

        fn select_base(&mut self, index: u8) {
            self.base_index = index;
        }
    }

    #[test]
    fn transparent_entries_fall_back() {
        let layout = TestLayout::default();
        let id = Id(1);
        let pairs: Vec<(&Id, TestLayer), 8> = [(&id, TestLayer::Overlay)].into_iter().collect();
        let keys: Vec<Key, 8> = resolve_keys(&layout, &pairs);
        assert_eq!(keys.as_slice(), &[Key::B]);
    }

    #[test]
    fn unresolved_switches_are_dropped() {
        let layout = TestLayout::default();
        let id = Id(5);
        let pairs: Vec<(&Id, TestLayer), 8> = [(&id, TestLayer::Overlay)].into_iter().collect();
        let keys: Vec<Key, 8> = resolve_keys(&layout, &pairs);
        assert!(keys.is_empty());
    }

    #[test]
    fn held_switches_keep_their_press_time_layer() {
        let pressed: FnvIndexMap<Id, TestLayer, 16> =
            [(Id(0), TestLayer::Base)].into_iter().collect();
        let switches = [Id(0), Id(9)];
        let latched: Vec<(&Id, TestLayer), 8> =
            latch_layers(&pressed, &switches, TestLayer::Overlay);
        assert_eq!(latched[0], (&Id(0), TestLayer::Base));
        assert_eq!(latched[1], (&Id(9), TestLayer::Overlay));
    }

    #[test]
    fn base_commands_fire_once_per_press() {
        let mut layout = TestLayout::default();
        let keys: Vec<Key, 8> = [Key::Base1, Key::A].into_iter().collect();

        let (keys, held) = apply_base_commands(&mut layout, &Vec::new(), keys);
        assert_eq!(keys.as_slice(), &[Key::A]);
        assert_eq!(held.as_slice(), &[Key::Base1]);
        assert_eq!(layout.base_index, 1);

        // Still held: must not re-fire even if the base changed meanwhile.
        layout.base_index = 0;
        let again: Vec<Key, 8> = [Key::Base1].into_iter().collect();
        let (_, held) = apply_base_commands(&mut layout, &held, again);
        assert_eq!(layout.base_index, 0);
        assert_eq!(held.as_slice(), &[Key::Base1]);
    }

    #[test]
    fn chords_are_suppressed_next_to_plain_keys() {
        let keys: Vec<Key, 8> = [Key::Exclamation, Key::A].into_iter().collect();
        let keys = suppress_phantom_chords(keys);
        assert_eq!(keys.as_slice(), &[Key::A]);

        let alone: Vec<Key, 8> = [Key::Exclamation].into_iter().collect();
        let alone = suppress_phantom_chords(alone);
        assert_eq!(alone.as_slice(), &[Key::Exclamation]);
    }

    #[test]
    fn latched_overlay_outlives_the_global_layer() {
        // Pressed on Overlay, still resolves there after the overlay is gone.
        let pressed: FnvIndexMap<Id, TestLayer, 16> =
            [(Id(0), TestLayer::Overlay)].into_iter().collect();
        let switches = [Id(0)];
        let latched: Vec<(&Id, TestLayer), 8> =
            latch_layers(&pressed, &switches, TestLayer::Base);
        let layout = TestLayout::default();
        let keys: Vec<Key, 8> = resolve_keys(&layout, &latched);
        assert_eq!(keys.as_slice(), &[Key::Num1]);
    }

    #[test]
    fn multiple_keys_resolve_in_scan_order() {
        let switches = [Id(0), Id(1)];
        let pairs: Vec<(&Id, TestLayer), 8> =
            switches.iter().map(|s| (s, TestLayer::Base)).collect();
        let layout = TestLayout::default();
        let keys: Vec<Key, 8> = resolve_keys(&layout, &pairs);
        assert_eq!(keys.as_slice(), &[Key::A, Key::B]);
    }
}
