//! Simulated test point for integration tests.
//!
//! One object implements every probe port, the same way the board adapter
//! does.  The probe line is modelled by a [`LineDrive`] and a simulated
//! clock advanced by `delay_ns`, so edge windows, settle delays and bias
//! changes interact the way they do on the real net.  Every port call is
//! recorded so tests can assert on the exact stage order.

use embedded_hal::delay::DelayNs;
use logicprobe::app::events::ProbeEvent;
use logicprobe::app::ports::{
    AnalogChannel, AnalogPort, BiasMode, BiasPort, EdgeWatcher, EventSink, IndicatorPort, LevelPort,
};
use logicprobe::error::{ActuatorError, Result, SensorError};
use logicprobe::probe::indicator::LinePattern;

/// 10-bit codes the simulated converter returns for driven lines.
pub const DRIVEN_HIGH_CODE: u16 = 1_000;
pub const DRIVEN_LOW_CODE: u16 = 20;

/// What the outside world is doing to the test point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDrive {
    High,
    Low,
    /// Nothing attached; the line follows the bias.
    Floating,
    /// Square wave, starting high at t = 0.
    Toggle { half_period_ns: u64 },
    /// Driven to a fixed analog level (10-bit code).
    Voltage(u16),
}

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Analog(AnalogChannel),
    Bias(BiasMode),
    Arm,
    Disarm,
    Level,
    Show(LinePattern),
}

// ── SimProbe ──────────────────────────────────────────────────

pub struct SimProbe {
    pub drive: LineDrive,
    /// Level-select divider reading (10-bit code).
    pub selector: u16,
    pub ops: Vec<Op>,
    /// Bias mode at every probe-channel conversion.
    pub bias_at_probe_read: Vec<BiasMode>,
    pub fail_probe_adc: bool,
    pub fail_level: bool,
    pub fail_show: bool,
    bias: BiasMode,
    now_ns: u64,
    armed: bool,
    flag: bool,
    shown: Option<LinePattern>,
}

#[allow(dead_code)]
impl SimProbe {
    pub fn new(selector: u16, drive: LineDrive) -> Self {
        Self {
            drive,
            selector,
            ops: Vec::new(),
            bias_at_probe_read: Vec::new(),
            fail_probe_adc: false,
            fail_level: false,
            fail_show: false,
            bias: BiasMode::Disconnected,
            now_ns: 0,
            armed: false,
            flag: false,
            shown: None,
        }
    }

    /// Selector position reading well above the midpoint.
    pub fn ttl(drive: LineDrive) -> Self {
        Self::new(900, drive)
    }

    /// Selector position reading well below the midpoint.
    pub fn cmos(drive: LineDrive) -> Self {
        Self::new(300, drive)
    }

    pub fn bias(&self) -> BiasMode {
        self.bias
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn shown(&self) -> Option<LinePattern> {
        self.shown
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn phase_high(&self, at_ns: u64) -> bool {
        match self.drive {
            LineDrive::Toggle { half_period_ns } => (at_ns / half_period_ns) % 2 == 0,
            _ => false,
        }
    }

    fn level(&self) -> bool {
        match self.drive {
            LineDrive::High => true,
            LineDrive::Low => false,
            LineDrive::Floating => self.bias == BiasMode::PullHigh,
            LineDrive::Toggle { .. } => self.phase_high(self.now_ns),
            LineDrive::Voltage(code) => code >= 512,
        }
    }

    fn probe_code(&self) -> u16 {
        match self.drive {
            LineDrive::High => DRIVEN_HIGH_CODE,
            LineDrive::Low => DRIVEN_LOW_CODE,
            LineDrive::Floating => match self.bias {
                BiasMode::PullHigh => DRIVEN_HIGH_CODE,
                // The pull-down ran last; an undriven line sits near ground.
                BiasMode::PullLow | BiasMode::Disconnected => 0,
            },
            LineDrive::Toggle { .. } => {
                if self.phase_high(self.now_ns) {
                    DRIVEN_HIGH_CODE
                } else {
                    DRIVEN_LOW_CODE
                }
            }
            LineDrive::Voltage(code) => code,
        }
    }
}

impl AnalogPort for SimProbe {
    fn read_channel(&mut self, channel: AnalogChannel) -> Result<u16> {
        self.ops.push(Op::Analog(channel));
        match channel {
            AnalogChannel::Selector => Ok(self.selector),
            AnalogChannel::Probe => {
                self.bias_at_probe_read.push(self.bias);
                if self.fail_probe_adc {
                    return Err(SensorError::AdcTimeout.into());
                }
                Ok(self.probe_code())
            }
        }
    }
}

impl LevelPort for SimProbe {
    fn read_level(&mut self) -> Result<bool> {
        self.ops.push(Op::Level);
        if self.fail_level {
            return Err(SensorError::GpioReadFailed.into());
        }
        Ok(self.level())
    }
}

impl BiasPort for SimProbe {
    fn set_bias(&mut self, mode: BiasMode) -> Result<()> {
        self.ops.push(Op::Bias(mode));
        self.bias = mode;
        Ok(())
    }
}

impl EdgeWatcher for SimProbe {
    fn arm(&mut self) -> Result<()> {
        self.ops.push(Op::Arm);
        self.armed = true;
        Ok(())
    }

    fn disarm(&mut self) -> Result<()> {
        self.ops.push(Op::Disarm);
        self.armed = false;
        Ok(())
    }

    fn consume_flag(&mut self) -> bool {
        core::mem::take(&mut self.flag)
    }
}

impl IndicatorPort for SimProbe {
    fn show(&mut self, pattern: LinePattern) -> Result<()> {
        self.ops.push(Op::Show(pattern));
        if self.fail_show {
            return Err(ActuatorError::GpioWriteFailed.into());
        }
        self.shown = Some(pattern);
        Ok(())
    }
}

impl DelayNs for SimProbe {
    fn delay_ns(&mut self, ns: u32) {
        let start = self.now_ns;
        self.now_ns += u64::from(ns);
        if self.armed && self.phase_high(start) != self.phase_high(self.now_ns) {
            self.flag = true;
        }
        if let LineDrive::Toggle { half_period_ns } = self.drive {
            // A wait of a full half period always spans an edge.
            if self.armed && u64::from(ns) >= half_period_ns {
                self.flag = true;
            }
        }
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ProbeEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&ProbeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ProbeEvent) {
        self.events.push(event.clone());
    }
}
