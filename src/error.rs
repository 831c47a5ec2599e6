//! Unified error types for the logic probe firmware.
//!
//! The probe itself has no failure modes in its measurement domain: every
//! physical state of the test point maps to some indicator pattern.  What
//! can fail is the hardware underneath, so this module only describes
//! peripheral faults.  All variants are `Copy` so they can be carried in
//! events and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible hardware operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An input (ADC or digital sense) could not be read.
    Sensor(SensorError),
    /// An output (indicator line, bias pin, interrupt mask) could not be set.
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The oneshot driver gave up waiting for the conversion (`ESP_ERR_TIMEOUT`).
    AdcTimeout,
    /// The ADC driver returned an error code.
    AdcReadFailed,
    /// Digital level read of the probe line failed.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcTimeout => write!(f, "ADC conversion timed out"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO level or direction write failed.
    GpioWriteFailed,
    /// Edge interrupt could not be enabled or disabled.
    InterruptMaskFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::InterruptMaskFailed => write!(f, "interrupt mask update failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
