//! Port traits: the boundary between the probe logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProbeService (domain)
//! ```
//!
//! The board adapter implements every port on one object, because all of
//! them ultimately touch the same physical net.  The
//! [`ProbeService`](super::service::ProbeService) takes that object through
//! the [`ProbeHardware`] bound, so the cycle logic never sees a register.
//!
//! Delays come from [`embedded_hal::delay::DelayNs`]; settle times and the
//! edge window are fixed busy waits.

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::probe::indicator::LinePattern;

// ───────────────────────────────────────────────────────────────
// Analog reference
// ───────────────────────────────────────────────────────────────

/// ADC inputs used by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// TTL/CMOS level-select divider.
    Selector,
    /// The test point itself.
    Probe,
}

/// Supply-referenced converter.  `read_channel` blocks until the
/// conversion completes (or the driver's own timeout fires) and returns
/// a 10-bit code.
pub trait AnalogPort {
    fn read_channel(&mut self, channel: AnalogChannel) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Probe line (digital view)
// ───────────────────────────────────────────────────────────────

/// Instantaneous digital level of the probe line.
pub trait LevelPort {
    fn read_level(&mut self) -> Result<bool>;
}

// ───────────────────────────────────────────────────────────────
// Bias resource
// ───────────────────────────────────────────────────────────────

/// State of the weak pull driver on the probe line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BiasMode {
    /// Pull pin is a high-impedance input; the line is undisturbed.
    #[default]
    Disconnected,
    /// Pull pin drives high through the bias resistor.
    PullHigh,
    /// Pull pin drives low through the bias resistor.
    PullLow,
}

/// Raw control of the bias pin.  Callers go through
/// [`BiasDriver`](crate::drivers::bias::BiasDriver), which tracks the mode
/// and puts the pin back to [`BiasMode::Disconnected`].
pub trait BiasPort {
    fn set_bias(&mut self, mode: BiasMode) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Edge watcher
// ───────────────────────────────────────────────────────────────

/// Edge-sensitive latch on the probe line.
///
/// While armed, any transition sets a flag from interrupt context.
/// [`consume_flag`](EdgeWatcher::consume_flag) returns and clears it.
pub trait EdgeWatcher {
    fn arm(&mut self) -> Result<()>;
    fn disarm(&mut self) -> Result<()>;
    fn consume_flag(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator outputs
// ───────────────────────────────────────────────────────────────

/// The three shared LED lines.
pub trait IndicatorPort {
    fn show(&mut self, pattern: LinePattern) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Whole board
// ───────────────────────────────────────────────────────────────

/// Everything one probe cycle needs.
pub trait ProbeHardware:
    AnalogPort + LevelPort + BiasPort + EdgeWatcher + IndicatorPort + DelayNs
{
}

impl<T> ProbeHardware for T where
    T: AnalogPort + LevelPort + BiasPort + EdgeWatcher + IndicatorPort + DelayNs
{
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`ProbeEvent`](super::events::ProbeEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ProbeEvent);
}
