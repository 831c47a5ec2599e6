//! Charlieplexed indicator LEDs on three output lines.
//!
//! Each line is an [`embedded_hal::digital::OutputPin`]; the driver writes
//! the three levels of a [`LinePattern`].  Lines are always written in
//! order 0, 1, 2, and only when the pattern changed.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{ActuatorError, Result};
use crate::probe::indicator::LinePattern;

pub struct IndicatorLines<A, B, C> {
    line0: A,
    line1: B,
    line2: C,
    current: Option<LinePattern>,
}

impl<A, B, C> IndicatorLines<A, B, C>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
{
    pub fn new(line0: A, line1: B, line2: C) -> Self {
        Self { line0, line1, line2, current: None }
    }

    pub fn show(&mut self, pattern: LinePattern) -> Result<()> {
        if self.current == Some(pattern) {
            return Ok(());
        }
        // Forget the cached pattern until every line has been written.
        self.current = None;
        write(&mut self.line0, pattern.line(0))?;
        write(&mut self.line1, pattern.line(1))?;
        write(&mut self.line2, pattern.line(2))?;
        self.current = Some(pattern);
        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        self.show(LinePattern::OFF)
    }

    pub fn current(&self) -> Option<LinePattern> {
        self.current
    }
}

fn write<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    pin.set_state(PinState::from(high))
        .map_err(|_| ActuatorError::GpioWriteFailed.into())
}
