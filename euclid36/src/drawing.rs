use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point},
    text::Text,
    Drawable,
};
use heapless::String;
use splitkbd::keyboard::{KeyboardState, Layer as _};

use crate::layout::Layer;

/// 128x32 euclid36 logo, one bit per pixel, row-major.
#[rustfmt::skip]
const LOGO: [u8; 512] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x38, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x38, 0x78, 0x00, 0x38, 0x1f, 0xe0, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7c, 0x78, 0x00, 0x38, 0x3f, 0xf0, 0x1f, 0xc0, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7c, 0x78, 0x00, 0x38, 0x7f, 0xf8, 0x7f, 0xe0, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7c, 0x78, 0x00, 0x38, 0x7f, 0xf8, 0xff, 0xf0, 0x00,
    0x00, 0x00, 0x10, 0x1e, 0x00, 0x00, 0x00, 0x7c, 0x00, 0x00, 0x3c, 0xfe, 0xf8, 0xfb, 0xf0, 0x00,
    0x00, 0x01, 0xfc, 0x1f, 0x0e, 0x0f, 0xfc, 0x7c, 0x00, 0x3f, 0xfc, 0xfe, 0x78, 0xf1, 0xf0, 0x00,
    0x00, 0x07, 0xfe, 0x3f, 0x0e, 0x1f, 0xfc, 0x7c, 0x00, 0x7f, 0xfc, 0xfe, 0x78, 0xf1, 0xf8, 0x00,
    0x00, 0x0f, 0xfe, 0x3f, 0x0e, 0x1f, 0xfe, 0x78, 0x00, 0xff, 0xfc, 0xfc, 0x79, 0xf1, 0xf8, 0x00,
    0x00, 0x1e, 0x1f, 0x3f, 0x0e, 0x3e, 0xfe, 0x78, 0x38, 0xff, 0xfc, 0x7c, 0x79, 0xf1, 0xf8, 0x00,
    0x00, 0x1e, 0x1f, 0x3e, 0x0e, 0x3c, 0x7f, 0x78, 0x38, 0xfc, 0x7c, 0x00, 0x79, 0xf8, 0x00, 0x00,
    0x00, 0x1e, 0x7e, 0x3e, 0x0e, 0x3c, 0x3e, 0x78, 0x79, 0xf8, 0x1c, 0x03, 0xf0, 0xfe, 0x00, 0x00,
    0x00, 0x1f, 0xfc, 0x3e, 0x0e, 0x3c, 0x3c, 0x7c, 0x79, 0xf8, 0x1c, 0x07, 0xf1, 0xff, 0xf0, 0x00,
    0x00, 0x1f, 0xf0, 0x3f, 0x1f, 0x38, 0x00, 0x7c, 0x79, 0xf8, 0x1e, 0x07, 0xf1, 0xff, 0xf8, 0x00,
    0x00, 0x1e, 0x00, 0x3f, 0xff, 0x38, 0x00, 0x7c, 0x79, 0xf8, 0x3e, 0x01, 0xf9, 0xfc, 0x38, 0x00,
    0x00, 0x1e, 0x00, 0x3f, 0xff, 0x3c, 0x00, 0x7c, 0x7d, 0xff, 0xfe, 0x00, 0x39, 0xf8, 0x1c, 0x00,
    0x00, 0x0f, 0xbf, 0x3f, 0xef, 0xbc, 0x06, 0x3c, 0x7d, 0xff, 0xfe, 0x30, 0x38, 0xf8, 0x1c, 0x00,
    0x00, 0x0f, 0xff, 0x1c, 0x0f, 0xbf, 0xfe, 0x3f, 0x7d, 0xff, 0xfe, 0x7c, 0x38, 0xfc, 0x38, 0x00,
    0x00, 0x0f, 0xff, 0x00, 0x07, 0x1f, 0xfe, 0x7f, 0xfc, 0xff, 0xfe, 0x7f, 0xf8, 0x7f, 0xf8, 0x00,
    0x00, 0x07, 0xff, 0x00, 0x00, 0x0f, 0xfc, 0xff, 0x7c, 0x3f, 0x3e, 0x3f, 0xf0, 0x7f, 0xf8, 0x00,
    0x00, 0x03, 0xfe, 0x00, 0x00, 0x03, 0xf8, 0x7e, 0x38, 0x00, 0x3e, 0x00, 0x00, 0x3f, 0xc0, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe0, 0x00, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Idle screen shown on the receiving half.
pub fn draw_logo(display: &mut impl DrawTarget<Color = BinaryColor>) {
    display.clear(BinaryColor::Off).ok();
    let raw = ImageRaw::<BinaryColor>::new(&LOGO, 128);
    Image::new(&raw, Point::zero()).draw(display).ok();
}

/// Status screen shown on the half that owns USB: product name, caps lock
/// state and the active layer.
pub fn draw_status<const RO: usize>(
    display: &mut impl DrawTarget<Color = BinaryColor>,
    state: &KeyboardState<Layer, RO>,
) {
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    display.clear(BinaryColor::Off).ok();

    Text::new("euclid36", Point::new(0, 8), style)
        .draw(display)
        .ok();

    let mut caps: String<10> = String::new();
    caps.push_str("Caps: ").ok();
    caps.push_str(if state.leds.caps_lock { "on" } else { "off" })
        .ok();
    Text::new(caps.as_str(), Point::new(0, 19), style)
        .draw(display)
        .ok();

    Text::new(state.layer.name(), Point::new(0, 30), style)
        .draw(display)
        .ok();
}
