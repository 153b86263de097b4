use embedded_hal_0_2::{digital::v2::InputPin, timer::CountDown};

use crate::switch_identifier::SwitchIdentifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Quadrature transition table, indexed by `previous << 2 | current` where
/// each state is `A << 1 | B`. Invalid transitions contribute nothing.
const STEPS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Transitions per detent on the encoders this board uses.
const DETENT_STEPS: i8 = 4;

/// Accumulates quadrature transitions into whole detents.
#[derive(Debug, Default)]
pub struct QuadratureDecoder {
    previous: u8,
    steps: i8,
}

impl QuadratureDecoder {
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        let current = (a as u8) << 1 | b as u8;
        let index = self.previous << 2 | current;
        self.previous = current;
        self.steps += STEPS[index as usize];
        if self.steps >= DETENT_STEPS {
            self.steps = 0;
            Some(Direction::Clockwise)
        } else if self.steps <= -DETENT_STEPS {
            self.steps = 0;
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Pulse {
    Idle,
    Emit { clockwise: bool },
    Gap,
}

/// Samples a rotary encoder and turns detents into pulses of a virtual
/// switch identifier.
///
/// A detent is reported for `pulse_len` so the USB report tick cannot miss
/// it, followed by a `gap_len` of silence so consecutive detents arrive at
/// the host as distinct taps. Detents seen meanwhile queue up, bounded.
pub struct RotaryEncoder<A, B, C: CountDown>
where
    C::Time: Copy,
{
    pin_a: A,
    pin_b: B,
    index: u8,
    decoder: QuadratureDecoder,
    timer: C,
    pulse_len: C::Time,
    gap_len: C::Time,
    pending: i8,
    pulse: Pulse,
}

impl<A: InputPin, B: InputPin, C: CountDown> RotaryEncoder<A, B, C>
where
    C::Time: Copy,
{
    const MAX_PENDING: i8 = 8;

    pub fn new(pin_a: A, pin_b: B, index: u8, timer: C, pulse_len: C::Time, gap_len: C::Time) -> Self {
        RotaryEncoder {
            pin_a,
            pin_b,
            index,
            decoder: QuadratureDecoder::default(),
            timer,
            pulse_len,
            gap_len,
            pending: 0,
            pulse: Pulse::Idle,
        }
    }

    /// Samples the pins and returns the virtual switch currently held, if a
    /// detent pulse is in flight.
    pub fn scan(&mut self) -> Option<SwitchIdentifier> {
        let a = self.pin_a.is_high().unwrap_or(false);
        let b = self.pin_b.is_high().unwrap_or(false);
        match self.decoder.update(a, b) {
            Some(Direction::Clockwise) if self.pending < Self::MAX_PENDING => self.pending += 1,
            Some(Direction::CounterClockwise) if self.pending > -Self::MAX_PENDING => {
                self.pending -= 1
            }
            _ => {}
        }
        self.step();
        match self.pulse {
            Pulse::Emit { clockwise } => Some(SwitchIdentifier::Encoder {
                index: self.index,
                clockwise,
            }),
            _ => None,
        }
    }

    fn step(&mut self) {
        if let Pulse::Emit { .. } = self.pulse {
            if self.timer.wait().is_ok() {
                self.pulse = Pulse::Gap;
                self.timer.start(self.gap_len);
            }
        }
        if let Pulse::Gap = self.pulse {
            if self.timer.wait().is_ok() {
                self.pulse = Pulse::Idle;
            }
        }
        if let Pulse::Idle = self.pulse {
            if self.pending != 0 {
                let clockwise = self.pending > 0;
                self.pending += if clockwise { -1 } else { 1 };
                self.pulse = Pulse::Emit { clockwise };
                self.timer.start(self.pulse_len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone)]
    struct FakePin(Rc<Cell<bool>>);

    impl InputPin for FakePin {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    #[derive(Clone)]
    struct FakeTimer(Rc<Cell<bool>>);

    impl CountDown for FakeTimer {
        type Time = u32;

        fn start<T: Into<u32>>(&mut self, _count: T) {
            self.0.set(false);
        }

        fn wait(&mut self) -> nb::Result<(), void::Void> {
            if self.0.get() {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    const CLOCKWISE: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];
    const COUNTER: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

    #[test]
    fn decoder_recognises_full_detents() {
        let mut decoder = QuadratureDecoder::default();
        let mut detents = std::vec::Vec::new();
        for (a, b) in CLOCKWISE {
            if let Some(direction) = decoder.update(a, b) {
                detents.push(direction);
            }
        }
        assert_eq!(detents, [Direction::Clockwise]);

        for (a, b) in COUNTER {
            if let Some(direction) = decoder.update(a, b) {
                detents.push(direction);
            }
        }
        assert_eq!(detents, [Direction::Clockwise, Direction::CounterClockwise]);
    }

    #[test]
    fn bouncy_transitions_do_not_accumulate() {
        let mut decoder = QuadratureDecoder::default();
        // Half a detent forward, then back to rest.
        assert_eq!(decoder.update(true, false), None);
        assert_eq!(decoder.update(true, true), None);
        assert_eq!(decoder.update(true, false), None);
        assert_eq!(decoder.update(false, false), None);
    }

    #[test]
    fn detents_stretch_into_pulses_with_gaps() {
        let pin_a = Rc::new(Cell::new(false));
        let pin_b = Rc::new(Cell::new(false));
        let expired = Rc::new(Cell::new(false));
        let mut encoder = RotaryEncoder::new(
            FakePin(pin_a.clone()),
            FakePin(pin_b.clone()),
            1,
            FakeTimer(expired.clone()),
            10u32,
            5u32,
        );

        let mut held = None;
        for (a, b) in CLOCKWISE {
            pin_a.set(a);
            pin_b.set(b);
            held = encoder.scan();
        }
        assert_eq!(
            held,
            Some(SwitchIdentifier::Encoder {
                index: 1,
                clockwise: true,
            })
        );

        // Pulse keeps being reported until the timer fires.
        assert!(encoder.scan().is_some());
        expired.set(true);
        assert!(encoder.scan().is_none()); // gap begins, timer restarted
        expired.set(true);
        assert!(encoder.scan().is_none()); // back to idle
        assert!(encoder.scan().is_none());
    }

    #[test]
    fn queued_detents_emit_one_pulse_each() {
        let pin_a = Rc::new(Cell::new(false));
        let pin_b = Rc::new(Cell::new(false));
        let expired = Rc::new(Cell::new(false));
        let mut encoder = RotaryEncoder::new(
            FakePin(pin_a.clone()),
            FakePin(pin_b.clone()),
            0,
            FakeTimer(expired.clone()),
            10u32,
            5u32,
        );

        for _ in 0..2 {
            for (a, b) in CLOCKWISE {
                pin_a.set(a);
                pin_b.set(b);
                encoder.scan();
            }
        }

        // First pulse in flight, one more queued.
        expired.set(true);
        assert!(encoder.scan().is_none()); // gap
        expired.set(true);
        assert!(encoder.scan().is_some()); // second pulse
        expired.set(true);
        assert!(encoder.scan().is_none()); // its gap
        expired.set(true);
        assert!(encoder.scan().is_none()); // drained
    }
}
