//! Firmware for the euclid36, a 36-key column-staggered split keyboard with
//! a 128x32 OLED and one rotary encoder per half.
//!
//! The hardware-facing wiring lives in `main.rs`; this library holds the
//! parts that are plain logic: the layer tables, the input scanners and the
//! display content.
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod drawing;
pub mod key_matrix;
pub mod layout;
pub mod rotary_encoder;
pub mod scanner;
pub mod switch_identifier;
