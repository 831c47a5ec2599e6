//! Output encoding for the four probe LEDs on three shared lines.
//!
//! The LEDs are charlieplexed, so an indicator is a bit pattern across
//! the lines rather than one line each:
//!
//! | Indicator | Lines (2..0)                          |
//! |-----------|---------------------------------------|
//! | FL        | `100`                                 |
//! | LO        | `010`                                 |
//! | HI        | `101`                                 |
//! | OS        | clear line 2, then set line 0         |
//!
//! HI and OS share line 0.  OS is layered on top of whatever HI/LO already
//! set, touching only line 2 and line 0, so the HI/LO pattern survives.

/// Levels of the three indicator lines, bit `n` = line `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinePattern(u8);

impl LinePattern {
    pub const OFF: Self = Self(0);
    pub const LINE_COUNT: u8 = 3;
    const MASK: u8 = 0b111;

    const FLOATING: u8 = 0b100;
    const LOW: u8 = 0b010;
    const HIGH: u8 = 0b101;
    const OSC_CLEAR: u8 = 0b100;
    const OSC_SET: u8 = 0b001;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of line `n` (0..3).
    pub const fn line(self, n: u8) -> bool {
        n < Self::LINE_COUNT && self.0 & (1 << n) != 0
    }

    const fn with(self, bits: u8) -> Self {
        Self(self.0 | bits)
    }

    const fn without(self, bits: u8) -> Self {
        Self(self.0 & !bits)
    }
}

/// Logical indicator request for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indicators {
    pub floating: bool,
    pub high: bool,
    pub low: bool,
    pub oscillating: bool,
}

impl Indicators {
    /// What actually gets displayed: FL suppresses everything else.
    pub fn shown(self) -> Self {
        if self.floating {
            Self {
                floating: true,
                ..Self::default()
            }
        } else {
            self
        }
    }
}

/// Map a logical request onto the line pattern, in priority order.
pub fn encode(request: Indicators) -> LinePattern {
    let mut pattern = LinePattern::OFF;

    if request.floating {
        return pattern.with(LinePattern::FLOATING);
    }
    if request.low {
        pattern = pattern.with(LinePattern::LOW);
    }
    if request.high {
        pattern = pattern.with(LinePattern::HIGH);
    }
    if request.oscillating {
        pattern = pattern
            .without(LinePattern::OSC_CLEAR)
            .with(LinePattern::OSC_SET);
    }
    pattern
}
