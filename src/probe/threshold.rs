//! Threshold selection between the TTL and CMOS logic families.
//!
//! The level-select switch is a resistor divider on its own ADC channel.
//! One reading per cycle picks the active [`ThresholdProfile`]; there is
//! no hysteresis, so flipping the switch takes effect on the next cycle.
//!
//! All codes are 10-bit ADC values against the supply rail (0 = GND,
//! 1023 = Vcc at 5 V).

use serde::{Deserialize, Serialize};

/// Largest code the 10-bit conversion can produce.
pub const ADC_FULL_SCALE: u16 = 1023;

/// Default switch midpoint: readings below this select CMOS.
pub const SELECTOR_MIDPOINT: u16 = 768;

/// Logic family the probe is currently calibrated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicFamily {
    Ttl,
    Cmos,
}

/// A (low, high) pair of ADC codes.
///
/// Readings strictly below `low` are logic LOW, strictly above `high` are
/// logic HIGH, anything in between is indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    pub low: u16,
    pub high: u16,
}

impl ThresholdProfile {
    /// TTL at 5 V: 0.8 V / 2.0 V.
    pub const TTL: Self = Self::new(164, 409);
    /// CMOS at 5 V: 1.5 V / 3.5 V.
    pub const CMOS: Self = Self::new(307, 716);

    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// `low < high` and both within the converter range.
    pub const fn is_valid(&self) -> bool {
        self.low < self.high && self.high <= ADC_FULL_SCALE
    }
}

/// Picks a profile from a selector reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSelector {
    ttl: ThresholdProfile,
    cmos: ThresholdProfile,
    midpoint: u16,
}

impl Default for ThresholdSelector {
    fn default() -> Self {
        Self::new(ThresholdProfile::TTL, ThresholdProfile::CMOS, SELECTOR_MIDPOINT)
    }
}

impl ThresholdSelector {
    pub const fn new(ttl: ThresholdProfile, cmos: ThresholdProfile, midpoint: u16) -> Self {
        Self {
            ttl,
            cmos,
            midpoint,
        }
    }

    /// Family for one selector reading: CMOS below the midpoint, TTL at or above.
    pub fn family(&self, reading: u16) -> LogicFamily {
        if reading < self.midpoint {
            LogicFamily::Cmos
        } else {
            LogicFamily::Ttl
        }
    }

    pub fn profile(&self, family: LogicFamily) -> ThresholdProfile {
        match family {
            LogicFamily::Ttl => self.ttl,
            LogicFamily::Cmos => self.cmos,
        }
    }

    pub fn select(&self, reading: u16) -> (LogicFamily, ThresholdProfile) {
        let family = self.family(reading);
        (family, self.profile(family))
    }
}
