//! Building blocks for split mechanical keyboard firmware: a HID-oriented
//! key model, layer/layout traits, a scan-to-report controller, a USB
//! reporter, and a half-to-half serial transport.
//!
//! Board crates supply the hardware side (a [`keyboard::KeySwitches`]
//! implementation and a [`split::Connection`]) plus a [`keyboard::Layout`]
//! describing their key tables, and drive [`keyboard::Controller`] from
//! their main loop.
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod keyboard;
pub mod split;
pub mod usb;

pub use heapless::Vec;
