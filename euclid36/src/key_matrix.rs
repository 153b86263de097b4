use embedded_hal_0_2::{
    blocking::delay::DelayUs,
    digital::v2::{InputPin, OutputPin},
};
use splitkbd::Vec;

use crate::switch_identifier::SwitchIdentifier;

/// Column-driven key matrix. Columns are pulsed high one at a time and rows
/// are read back through pull-downs.
pub struct KeyMatrix<I, O, D, const ROWS: usize, const COLS: usize> {
    rows: [I; ROWS],
    cols: [O; COLS],
    delay: D,
}

impl<I: InputPin, O: OutputPin, D: DelayUs<u16>, const ROWS: usize, const COLS: usize>
    KeyMatrix<I, O, D, ROWS, COLS>
{
    pub fn new(rows: [I; ROWS], mut cols: [O; COLS], delay: D) -> Self {
        for col in cols.iter_mut() {
            col.set_low().ok();
        }
        KeyMatrix { rows, cols, delay }
    }

    pub fn scan<const RO: usize>(&mut self) -> Vec<SwitchIdentifier, RO> {
        let mut switches = Vec::new();
        for (c, col) in self.cols.iter_mut().enumerate() {
            col.set_high().ok();
            self.delay.delay_us(20);
            for (r, row) in self.rows.iter().enumerate() {
                if row.is_high().unwrap_or(false) {
                    switches
                        .push(SwitchIdentifier::Key {
                            row: r as u8,
                            col: c as u8,
                        })
                        .ok();
                }
            }
            col.set_low().ok();
        }
        switches
    }
}
