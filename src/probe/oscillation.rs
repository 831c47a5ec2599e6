//! Oscillation detection and the decaying OS indicator counter.
//!
//! Two detectors feed one [`OscillationState`]:
//!
//! | Detector                  | Catches                                   |
//! |---------------------------|-------------------------------------------|
//! | [`TransientDetector`]     | any edge inside a ~1 ms armed window      |
//! |                           | (signals above roughly 500 Hz)            |
//! | [`SlowOscillationDetector`]| HIGH in one cycle, LOW in the next (or   |
//! |                           | the reverse)                              |
//!
//! Either one reloads the counter to its full duration.  The output stage
//! then burns one tick per displayed cycle, so the OS LED stays visibly lit
//! for `duration` loop iterations after the last event.

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use super::classify::{Classification, PriorClassification};
use crate::app::ports::{BiasMode, BiasPort, EdgeWatcher};
use crate::drivers::bias::BiasSession;
use crate::error::Result;

/// Which detector reloaded the oscillation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscillationSource {
    Transient,
    Slow,
}

/// Decay counter behind the OS indicator.  Owned by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillationState {
    remaining_ticks: u8,
    duration: u8,
}

impl OscillationState {
    pub const fn new(duration: u8) -> Self {
        Self {
            remaining_ticks: 0,
            duration,
        }
    }

    /// Reload to the full duration, overwriting any running count.
    pub fn trigger(&mut self) {
        self.remaining_ticks = self.duration;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0
    }

    pub fn remaining_ticks(&self) -> u8 {
        self.remaining_ticks
    }

    /// Spend one displayed cycle.  Returns whether the OS indicator is lit
    /// for this cycle.
    pub fn take_display_tick(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        true
    }
}

// ───────────────────────────────────────────────────────────────
// Transient (edge window) detector
// ───────────────────────────────────────────────────────────────

/// Arms the edge watcher for a short window with the line pulled high.
///
/// The pull-up keeps an undriven line from producing spurious edges.  The
/// bias is left high on return: the floating check that follows starts
/// from exactly that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransientDetector {
    settle_us: u32,
    window_us: u32,
}

impl TransientDetector {
    pub const fn new(settle_us: u32, window_us: u32) -> Self {
        Self {
            settle_us,
            window_us,
        }
    }

    /// Returns `true` if at least one edge was latched during the window.
    pub fn run<H>(&self, session: &mut BiasSession<'_, H>) -> Result<bool>
    where
        H: BiasPort + EdgeWatcher + DelayNs,
    {
        if session.set(BiasMode::PullHigh)? {
            session.port().delay_us(self.settle_us);
        }

        let hw = session.port();
        // Drop anything latched while the bias was moving.
        let _ = hw.consume_flag();
        hw.arm()?;
        hw.delay_us(self.window_us);
        hw.disarm()?;
        Ok(hw.consume_flag())
    }
}

// ───────────────────────────────────────────────────────────────
// Slow (cycle-to-cycle) detector
// ───────────────────────────────────────────────────────────────

/// Compares this cycle's level against the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlowOscillationDetector {
    prior: PriorClassification,
}

impl SlowOscillationDetector {
    pub const fn new() -> Self {
        Self {
            prior: PriorClassification {
                was_high: false,
                was_low: false,
            },
        }
    }

    /// Returns `true` if the level flipped since last cycle and the line is
    /// not floating.  The prior snapshot is overwritten either way.
    pub fn observe(&mut self, now: Classification, floating: bool) -> bool {
        let fired = !floating && self.prior.toggled_to(now);
        self.prior.record(now);
        fired
    }

    pub fn prior(&self) -> PriorClassification {
        self.prior
    }
}
