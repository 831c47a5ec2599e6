//! Probe configuration parameters
//!
//! All tunable parameters for the logic probe.  The probe has no
//! persistent storage, so the defaults below are what ships; the struct
//! exists so tests and board variants can change timing without touching
//! the detectors.

use serde::{Deserialize, Serialize};

use crate::probe::threshold::{ADC_FULL_SCALE, SELECTOR_MIDPOINT, ThresholdProfile};

/// Which oscillation machinery is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Edge-interrupt window plus cycle-to-cycle comparison; an active
    /// oscillation clears the floating flag.
    Full,
    /// Cycle-to-cycle comparison only.  No edge interrupt is armed and the
    /// floating flag is reported as measured.
    PollingOnly,
}

/// Core probe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    // --- Thresholds ---
    /// TTL thresholds (10-bit codes)
    pub ttl: ThresholdProfile,
    /// CMOS thresholds (10-bit codes)
    pub cmos: ThresholdProfile,
    /// Selector readings below this pick CMOS
    pub selector_midpoint: u16,

    // --- Oscillation ---
    pub mode: DetectionMode,
    /// Cycles the OS indicator stays lit after the last detection
    pub oscillation_decay_cycles: u8,
    /// Edge watch window (microseconds)
    pub edge_window_us: u32,

    // --- Timing ---
    /// Settle time after every bias change (microseconds)
    pub bias_settle_us: u32,
    /// Emit a reading snapshot every N cycles (0 = never)
    pub report_interval_cycles: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            ttl: ThresholdProfile::TTL,
            cmos: ThresholdProfile::CMOS,
            selector_midpoint: SELECTOR_MIDPOINT,

            // Oscillation
            mode: DetectionMode::Full,
            oscillation_decay_cycles: 50,
            edge_window_us: 1_000, // catches > ~500 Hz

            // Timing
            bias_settle_us: 10,
            report_interval_cycles: 500,
        }
    }
}

impl ProbeConfig {
    /// Reduced-feature variant without the edge interrupt.
    pub fn polling_only() -> Self {
        Self {
            mode: DetectionMode::PollingOnly,
            ..Self::default()
        }
    }

    /// Reject values the detectors cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ttl.is_valid() {
            return Err(ConfigError::ValidationFailed("ttl: low must be below high, both <= 1023"));
        }
        if !self.cmos.is_valid() {
            return Err(ConfigError::ValidationFailed("cmos: low must be below high, both <= 1023"));
        }
        if self.selector_midpoint == 0 || self.selector_midpoint > ADC_FULL_SCALE {
            return Err(ConfigError::ValidationFailed("selector_midpoint outside 1..=1023"));
        }
        if self.oscillation_decay_cycles == 0 {
            return Err(ConfigError::ValidationFailed("oscillation_decay_cycles must be > 0"));
        }
        if self.mode == DetectionMode::Full && self.edge_window_us == 0 {
            return Err(ConfigError::ValidationFailed("edge_window_us must be > 0 in full mode"));
        }
        Ok(())
    }
}

/// Errors from [`ProbeConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
