//! Level classification of one probe voltage sample.

use super::threshold::ThresholdProfile;

/// One 10-bit reading of the probe line against the supply reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSample {
    pub raw: u16,
}

impl ProbeSample {
    pub const fn new(raw: u16) -> Self {
        Self { raw }
    }
}

/// HIGH/LOW verdict for a sample.  Both false means the reading sat in the
/// indeterminate band between the two thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_high: bool,
    pub is_low: bool,
}

impl Classification {
    pub const INDETERMINATE: Self = Self {
        is_high: false,
        is_low: false,
    };

    /// Classify `sample` against `profile`.  Thresholds are exclusive on
    /// both sides, so a reading equal to either threshold is not a level.
    pub fn of(sample: ProbeSample, profile: &ThresholdProfile) -> Self {
        Self {
            is_high: sample.raw > profile.high,
            is_low: sample.raw < profile.low,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        !self.is_high && !self.is_low
    }
}

/// Previous cycle's classification, kept for the slow oscillation check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorClassification {
    pub was_high: bool,
    pub was_low: bool,
}

impl PriorClassification {
    /// True when `now` is the opposite level of the recorded one.
    /// Transitions through the indeterminate band do not count.
    pub fn toggled_to(&self, now: Classification) -> bool {
        (self.was_low && now.is_high) || (self.was_high && now.is_low)
    }

    pub fn record(&mut self, now: Classification) {
        self.was_high = now.is_high;
        self.was_low = now.is_low;
    }
}
