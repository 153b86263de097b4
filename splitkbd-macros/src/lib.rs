use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{quote, TokenStreamExt};
use syn::{parse_macro_input, Data, DeriveInput, LitStr};

/// Implements `splitkbd::keyboard::Layer` for an enum, naming each layer
/// after its variant.
#[proc_macro_derive(Layer)]
pub fn derive_layer(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = ast.ident;
    let arms = match ast.data {
        Data::Enum(ref data) => data.variants.iter().map(|v| &v.ident),
        _ => unimplemented!("Layer can only be derived for enums"),
    }
    .map(|v| {
        quote! {
            #name::#v => stringify!(#v),
        }
    })
    .reduce(|mut acc, arm| {
        acc.append_all(arm);
        acc
    });

    let expanded = quote! {
        impl splitkbd::keyboard::Layer for #name {
            fn name(&self) -> &'static str {
                match self {
                    #arms
                }
            }
        }
    };

    proc_macro::TokenStream::from(expanded)
}

macro_rules! key {
    ($legend:tt, $variant:ident) => {
        ($legend, quote!(splitkbd::keyboard::Key::$variant))
    };
    ($variant:ident) => {
        (stringify!($variant), quote!(splitkbd::keyboard::Key::$variant))
    };
}

/// Expands a `|`-separated grid of key legends into a `[[Key; C]; R]` array
/// literal. Empty cells are no-ops, `Trn` is transparent.
#[proc_macro]
pub fn layout(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as LitStr).value();

    let table = [
        key!("", None),
        key!("Trn", Transparent),
        key!(A),
        key!(B),
        key!(C),
        key!(D),
        key!(E),
        key!(F),
        key!(G),
        key!(H),
        key!(I),
        key!(J),
        key!(K),
        key!(L),
        key!(M),
        key!(N),
        key!(O),
        key!(P),
        key!(Q),
        key!(R),
        key!(S),
        key!(T),
        key!(U),
        key!(V),
        key!(W),
        key!(X),
        key!(Y),
        key!(Z),
        key!("1", Num1),
        key!("2", Num2),
        key!("3", Num3),
        key!("4", Num4),
        key!("5", Num5),
        key!("6", Num6),
        key!("7", Num7),
        key!("8", Num8),
        key!("9", Num9),
        key!("0", Num0),
        key!(Enter),
        key!("Esc", Escape),
        key!("Bspc", Backspace),
        key!(Tab),
        key!(Space),
        key!("-", Minus),
        key!("=", Equal),
        key!("[", LeftBracket),
        key!("]", RightBracket),
        key!("\\", Backslash),
        key!(";", Semicolon),
        key!("'", Quote),
        key!("`", Grave),
        key!(",", Comma),
        key!(".", Period),
        key!("/", Slash),
        key!("Caps", CapsLock),
        key!(F1),
        key!(F2),
        key!(F3),
        key!(F4),
        key!(F5),
        key!(F6),
        key!(F7),
        key!(F8),
        key!(F9),
        key!(F10),
        key!(F11),
        key!(F12),
        key!("PrScr", PrintScreen),
        key!("ScLck", ScrollLock),
        key!(Pause),
        key!("Ins", Insert),
        key!(Home),
        key!("PgUp", PageUp),
        key!("Del", Delete),
        key!(End),
        key!("PgDn", PageDown),
        key!(Right),
        key!(Left),
        key!(Down),
        key!(Up),
        key!("LCtl", LeftControl),
        key!("LSft", LeftShift),
        key!("LAlt", LeftAlt),
        key!("LGui", LeftGui),
        key!("RCtl", RightControl),
        key!("RSft", RightShift),
        key!("RAlt", RightAlt),
        key!("RGui", RightGui),
        key!("MNext", MediaNextTrack),
        key!("MPrev", MediaPrevTrack),
        key!("MStop", MediaStop),
        key!("MPlPs", MediaPlayPause),
        key!("MMute", MediaMute),
        key!("MVlUp", MediaVolumeUp),
        key!("MVlDn", MediaVolumeDown),
        key!("Btn1", MouseButton1),
        key!("Btn2", MouseButton2),
        key!("Btn3", MouseButton3),
        key!("MsUp", MouseUp),
        key!("MsDn", MouseDown),
        key!("MsLt", MouseLeft),
        key!("MsRt", MouseRight),
        key!("WhUp", MouseWheelUp),
        key!("WhDn", MouseWheelDown),
        key!("C-Bspc", CtrlBackspace),
        key!("C-Right", CtrlRight),
        key!("C-Left", CtrlLeft),
        key!("!", Exclamation),
        key!("@", At),
        key!("#", Hash),
        key!("$", Dollar),
        key!("%", Percent),
        key!("^", Caret),
        key!("&", Ampersand),
        key!("*", Asterisk),
        key!("(", LeftParen),
        key!(")", RightParen),
        key!("_", Underscore),
        key!("+", Plus),
        key!("{", LeftBrace),
        key!("}", RightBrace),
        key!("Pipe", Pipe),
        key!(":", Colon),
        key!("\"", DoubleQuote),
        key!("~", Tilde),
        key!("<", LessThan),
        key!(">", GreaterThan),
        key!("?", Question),
        key!("S-Home", ShiftHome),
        key!("S-PgUp", ShiftPageUp),
        key!("S-End", ShiftEnd),
        key!("S-PgDn", ShiftPageDown),
        key!("S-Right", ShiftRight),
        key!("S-Left", ShiftLeft),
        key!("S-Down", ShiftDown),
        key!("S-Up", ShiftUp),
        key!("A-Tab", AltTab),
        key!("G-1", GuiDigit1),
        key!("G-2", GuiDigit2),
        key!("G-3", GuiDigit3),
        key!("G-4", GuiDigit4),
        key!("G-5", GuiDigit5),
        key!("G-Right", GuiRight),
        key!("G-Left", GuiLeft),
        key!("G-Down", GuiDown),
        key!("G-Up", GuiUp),
        key!("Base0", Base0),
        key!("Base1", Base1),
        key!("Base2", Base2),
        key!("Base3", Base3),
    ]
    .into_iter()
    .collect::<HashMap<_, _>>();

    let rows = input
        .trim()
        .lines()
        .map(str::trim)
        .map(|line| {
            let cells = line
                .split('|')
                .map(str::trim)
                .collect::<Vec<_>>()
                .into_iter()
                .skip(1)
                .rev()
                .skip(1)
                .rev()
                .map(|legend| {
                    if let Some(key) = table.get(legend) {
                        key.clone()
                    } else {
                        let message = "layout: unknown legend: ".to_string() + legend;
                        quote!(compile_error!(#message))
                    }
                })
                .map(|key| quote! {#key,})
                .collect::<TokenStream>();
            quote! {
                [#cells],
            }
        })
        .collect::<TokenStream>();

    let expanded = quote! {
        [#rows]
    };

    proc_macro::TokenStream::from(expanded)
}
