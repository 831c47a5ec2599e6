//! ADC1 oneshot conversions.
//!
//! The IDF oneshot driver blocks until the conversion completes and gives
//! up on its own after an internal timeout, returning `ESP_ERR_TIMEOUT`.
//! This module turns the raw `esp_err_t` into a [`SensorError`] and the
//! native 12-bit code into the 10-bit scale the probe logic uses.

use crate::drivers::hw_init;
use crate::error::{Result, SensorError};
use crate::pins;

/// One blocking conversion at native resolution.  `Err` carries the
/// driver's `esp_err_t`.
pub trait OneshotAdc {
    fn read_raw(&mut self, channel: u32) -> core::result::Result<u16, i32>;
}

/// ADC1 through the oneshot driver configured in [`hw_init`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Adc1;

impl OneshotAdc for Adc1 {
    fn read_raw(&mut self, channel: u32) -> core::result::Result<u16, i32> {
        hw_init::adc1_read(channel)
    }
}

/// Map a driver error code onto the firmware error.
pub fn sensor_error(code: i32) -> SensorError {
    if code == hw_init::ADC_ERR_TIMEOUT {
        SensorError::AdcTimeout
    } else {
        SensorError::AdcReadFailed
    }
}

/// Reduce a native-resolution code to 10 bits.
pub fn scale_to_probe_bits(raw: u16) -> u16 {
    let shifted = raw >> (pins::ADC_NATIVE_BITS - pins::ADC_PROBE_BITS);
    shifted.min((1 << pins::ADC_PROBE_BITS) - 1)
}

/// Convert once on `channel` and return a 10-bit code.
pub fn read_probe_bits<A: OneshotAdc>(adc: &mut A, channel: u32) -> Result<u16> {
    match adc.read_raw(channel) {
        Ok(raw) => Ok(scale_to_probe_bits(raw)),
        Err(code) => {
            log::error!("adc: channel {} read failed (rc={})", channel, code);
            Err(sensor_error(code).into())
        }
    }
}
