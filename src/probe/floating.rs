//! Floating (undriven line) detection.
//!
//! The probe line is pulled first high, then low, through the weak bias
//! resistor.  A driven line ignores the bias and reads the same level both
//! times; an undriven one follows it.  The line is floating when it read
//! HIGH under the pull-up **and** LOW under the pull-down.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{BiasMode, BiasPort, LevelPort};
use crate::drivers::bias::BiasSession;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingDetector {
    settle_us: u32,
}

impl FloatingDetector {
    pub const fn new(settle_us: u32) -> Self {
        Self { settle_us }
    }

    /// Run the pull-up/pull-down comparison.
    ///
    /// Starts from whatever bias the session holds (normally the pull-up
    /// left by the transient check) and leaves the line pulled low; the
    /// caller finishes the session to disconnect it.
    pub fn evaluate<H>(&self, session: &mut BiasSession<'_, H>) -> Result<bool>
    where
        H: BiasPort + LevelPort + DelayNs,
    {
        if session.set(BiasMode::PullHigh)? {
            session.port().delay_us(self.settle_us);
        }
        let follows_pull_up = session.port().read_level()?;

        session.set(BiasMode::PullLow)?;
        session.port().delay_us(self.settle_us);
        let follows_pull_down = !session.port().read_level()?;

        Ok(follows_pull_up && follows_pull_down)
    }
}
