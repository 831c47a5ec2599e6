//! GPIO / ADC assignments for the probe board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.
//!
//! The probe tip is one net wired to three pins: an ADC input for the
//! voltage, a digital input for level reads and edge interrupts, and the
//! bias pin through a 100 kΩ resistor.

// ---------------------------------------------------------------------------
// Probe tip
// ---------------------------------------------------------------------------

/// Probe voltage, ADC1 channel 3 (GPIO 4).
pub const PROBE_ADC_CHANNEL: u32 = 3;

/// Digital sense input on the probe net; any-edge interrupt source.
pub const PROBE_SENSE_GPIO: i32 = 6;

/// Weak pull driver: output high / output low / input (disconnected).
pub const BIAS_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Level select switch (TTL / CMOS divider)
// ---------------------------------------------------------------------------

/// ADC1 channel 0 (GPIO 1).  Reads ≥ 75 % of Vcc in the TTL position.
pub const SELECTOR_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Indicator LEDs (charlieplexed on three lines)
// ---------------------------------------------------------------------------

pub const LED_LINE0_GPIO: i32 = 11;
pub const LED_LINE1_GPIO: i32 = 12;
pub const LED_LINE2_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// ADC scaling
// ---------------------------------------------------------------------------

/// Native ADC resolution; readings are shifted down to 10 bits.
pub const ADC_NATIVE_BITS: u32 = 12;
pub const ADC_PROBE_BITS: u32 = 10;
