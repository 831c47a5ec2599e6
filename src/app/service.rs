//! Probe service, the hexagonal core.
//!
//! [`ProbeService`] owns every piece of cross-cycle state (the oscillation
//! decay counter, the previous classification, the bias mode) and runs one
//! measurement cycle per call.  All I/O flows through the port traits, so
//! the whole cycle is testable against a simulated test point.
//!
//! ```text
//!  AnalogPort ─┐
//!  LevelPort  ─┤   ┌──────────────────────────┐
//!  BiasPort   ─┼──▶│       ProbeService        │──▶ IndicatorPort
//!  EdgeWatcher─┤   │ select · osc · float ·    │──▶ EventSink
//!  DelayNs    ─┘   │ classify · slow · encode  │
//!                  └──────────────────────────┘
//! ```
//!
//! The stage order is fixed.  The bias pin and the ADC are each used by
//! exactly one stage at a time, which is the only exclusion they need.

use log::{debug, info, warn};

use crate::config::{ConfigError, DetectionMode, ProbeConfig};
use crate::drivers::bias::BiasDriver;
use crate::error::Result;
use crate::probe::classify::{Classification, PriorClassification, ProbeSample};
use crate::probe::floating::FloatingDetector;
use crate::probe::indicator::{Indicators, LinePattern, encode};
use crate::probe::oscillation::{
    OscillationSource, OscillationState, SlowOscillationDetector, TransientDetector,
};
use crate::probe::threshold::{LogicFamily, ThresholdProfile, ThresholdSelector};

use super::events::ProbeEvent;
use super::ports::{
    AnalogChannel, BiasMode, BiasPort, EdgeWatcher, EventSink, IndicatorPort, ProbeHardware,
};

/// Everything one cycle measured and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    pub family: LogicFamily,
    pub profile: ThresholdProfile,
    pub sample: ProbeSample,
    pub classification: Classification,
    /// An edge was latched during the transient window.
    pub edge_seen: bool,
    /// HIGH/LOW flipped since the previous cycle.
    pub slow_toggle: bool,
    /// Raw pull-up/pull-down result, before the oscillation override.
    pub floating_measured: bool,
    /// Indicators actually displayed.
    pub shown: Indicators,
    pub pattern: LinePattern,
    /// Decay counter after this cycle's display tick.
    pub oscillation_remaining: u8,
}

// ───────────────────────────────────────────────────────────────
// ProbeService
// ───────────────────────────────────────────────────────────────

pub struct ProbeService {
    mode: DetectionMode,
    settle_us: u32,
    report_interval: u32,
    selector: ThresholdSelector,
    transient: TransientDetector,
    floating: FloatingDetector,
    slow: SlowOscillationDetector,
    oscillation: OscillationState,
    bias: BiasDriver,
    family: Option<LogicFamily>,
    floating_shown: bool,
    cycles: u64,
}

impl ProbeService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &ProbeConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            settle_us: config.bias_settle_us,
            report_interval: config.report_interval_cycles,
            selector: ThresholdSelector::new(config.ttl, config.cmos, config.selector_midpoint),
            transient: TransientDetector::new(config.bias_settle_us, config.edge_window_us),
            floating: FloatingDetector::new(config.bias_settle_us),
            slow: SlowOscillationDetector::new(),
            oscillation: OscillationState::new(config.oscillation_decay_cycles),
            bias: BiasDriver::new(),
            family: None,
            floating_shown: false,
            cycles: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the board into a known state: bias released, all LEDs off.
    pub fn start<H, S>(&mut self, hw: &mut H, sink: &mut S) -> Result<()>
    where
        H: BiasPort + IndicatorPort,
        S: EventSink,
    {
        self.bias.release(hw)?;
        hw.show(LinePattern::OFF)?;
        sink.emit(&ProbeEvent::Started(self.mode));
        info!("ProbeService started ({:?} mode)", self.mode);
        Ok(())
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one cycle and swallow hardware errors.
    ///
    /// A failed cycle is reported as [`ProbeEvent::HardwareFault`], the
    /// edge watcher is disarmed, the bias released and the LEDs blanked;
    /// the next call starts afresh.
    pub fn run_cycle<H, S>(&mut self, hw: &mut H, sink: &mut S) -> Option<CycleReport>
    where
        H: ProbeHardware,
        S: EventSink,
    {
        match self.cycle(hw, sink) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("cycle {} aborted: {}", self.cycles, e);
                sink.emit(&ProbeEvent::HardwareFault(e));
                self.recover(hw);
                None
            }
        }
    }

    /// Run one full cycle:
    /// select → transient → floating → classify → slow → encode.
    pub fn cycle<H, S>(&mut self, hw: &mut H, sink: &mut S) -> Result<CycleReport>
    where
        H: ProbeHardware,
        S: EventSink,
    {
        self.cycles += 1;

        // 1. Threshold profile from the level-select switch
        let (family, profile) = self
            .selector
            .select(hw.read_channel(AnalogChannel::Selector)?);
        if self.family != Some(family) {
            info!("profile {:?} -> {:?}", self.family, family);
            sink.emit(&ProbeEvent::ProfileChanged {
                from: self.family,
                to: family,
            });
            self.family = Some(family);
        }

        // 2–3. Transient window and floating check, sharing the bias pin
        let mut session = self.bias.session(hw);
        let edge_seen = match self.mode {
            DetectionMode::Full => self.transient.run(&mut session)?,
            DetectionMode::PollingOnly => false,
        };
        // A caught edge stands even if the floating check below faults.
        if edge_seen {
            trigger(&mut self.oscillation, OscillationSource::Transient, sink);
        }
        let floating_measured = self.floating.evaluate(&mut session)?;
        session.finish()?;
        hw.delay_us(self.settle_us);

        // 4. Level classification, with the line undisturbed
        let sample = ProbeSample::new(hw.read_channel(AnalogChannel::Probe)?);
        let classification = Classification::of(sample, &profile);

        // 5. Slow oscillation
        let slow_toggle = self.slow.observe(classification, floating_measured);
        if slow_toggle {
            trigger(&mut self.oscillation, OscillationSource::Slow, sink);
        }

        // A toggling line must never read as floating.
        let floating = match self.mode {
            DetectionMode::Full => floating_measured && !self.oscillation.is_active(),
            DetectionMode::PollingOnly => floating_measured,
        };
        if floating != self.floating_shown {
            debug!("floating -> {}", floating);
            sink.emit(&ProbeEvent::FloatingChanged(floating));
            self.floating_shown = floating;
        }

        // 6. Output
        let shown = Indicators {
            floating,
            high: classification.is_high,
            low: classification.is_low,
            oscillating: !floating && self.oscillation.take_display_tick(),
        }
        .shown();
        let pattern = encode(shown);
        hw.show(pattern)?;

        let report = CycleReport {
            cycle: self.cycles,
            family,
            profile,
            sample,
            classification,
            edge_seen,
            slow_toggle,
            floating_measured,
            shown,
            pattern,
            oscillation_remaining: self.oscillation.remaining_ticks(),
        };

        if self.report_interval != 0 && self.cycles % u64::from(self.report_interval) == 0 {
            sink.emit(&ProbeEvent::Reading(report));
        }

        Ok(report)
    }

    fn recover<H: BiasPort + EdgeWatcher + IndicatorPort>(&mut self, hw: &mut H) {
        if let Err(e) = hw.disarm() {
            warn!("recover: disarm failed: {}", e);
        }
        let _ = hw.consume_flag();
        if let Err(e) = self.bias.release(hw) {
            warn!("recover: bias release failed: {}", e);
        }
        if let Err(e) = hw.show(LinePattern::OFF) {
            warn!("recover: LED blank failed: {}", e);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn family(&self) -> Option<LogicFamily> {
        self.family
    }

    pub fn oscillation_remaining(&self) -> u8 {
        self.oscillation.remaining_ticks()
    }

    pub fn prior(&self) -> PriorClassification {
        self.slow.prior()
    }

    pub fn bias_mode(&self) -> BiasMode {
        self.bias.mode()
    }
}

fn trigger(
    oscillation: &mut OscillationState,
    source: OscillationSource,
    sink: &mut impl EventSink,
) {
    debug!("oscillation ({:?})", source);
    oscillation.trigger();
    sink.emit(&ProbeEvent::OscillationTriggered(source));
}
