//! Hardware adapter, bridging the board peripherals to the probe port traits.
//!
//! Owns the ADC, the sense input, the indicator lines and a handle to the
//! ISR-fed edge latch, and exposes them through every port the
//! [`ProbeService`](crate::app::service::ProbeService) needs.  This is the
//! only module in the system that touches actual hardware.  On non-espidf
//! targets the underlying `hw_init` calls are cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{
    AnalogChannel, AnalogPort, BiasMode, BiasPort, EdgeWatcher, IndicatorPort, LevelPort,
};
use crate::drivers::adc::{self, Adc1, OneshotAdc};
use crate::drivers::edge_latch::EdgeLatch;
use crate::drivers::hw_init;
use crate::drivers::indicators::IndicatorLines;
use crate::error::{ActuatorError, Result, SensorError};
use crate::pins;
use crate::probe::indicator::LinePattern;

fn adc_channel(channel: AnalogChannel) -> u32 {
    match channel {
        AnalogChannel::Selector => pins::SELECTOR_ADC_CHANNEL,
        AnalogChannel::Probe => pins::PROBE_ADC_CHANNEL,
    }
}

// ── Board adapter ─────────────────────────────────────────────

/// Concrete adapter that combines all probe hardware behind the port traits.
pub struct BoardHardware<A, S, L0, L1, L2, D> {
    adc: A,
    sense: S,
    leds: IndicatorLines<L0, L1, L2>,
    edge: &'static EdgeLatch,
    delay: D,
    bias_pin: i32,
}

/// The production wiring from [`pins`].
pub type Board = BoardHardware<
    Adc1,
    hw_init::GpioIn,
    hw_init::GpioOut,
    hw_init::GpioOut,
    hw_init::GpioOut,
    hw_init::BusyDelay,
>;

impl Board {
    /// Board adapter on the pins from [`pins`], fed by the probe ISR latch.
    pub fn on_pins() -> Self {
        BoardHardware::new(
            Adc1,
            hw_init::GpioIn(pins::PROBE_SENSE_GPIO),
            IndicatorLines::new(
                hw_init::GpioOut(pins::LED_LINE0_GPIO),
                hw_init::GpioOut(pins::LED_LINE1_GPIO),
                hw_init::GpioOut(pins::LED_LINE2_GPIO),
            ),
            &crate::drivers::edge_latch::PROBE_EDGE,
            hw_init::BusyDelay,
            pins::BIAS_GPIO,
        )
    }
}

impl<A, S, L0, L1, L2, D> BoardHardware<A, S, L0, L1, L2, D>
where
    A: OneshotAdc,
    S: InputPin,
    L0: OutputPin,
    L1: OutputPin,
    L2: OutputPin,
    D: DelayNs,
{
    pub fn new(
        adc: A,
        sense: S,
        leds: IndicatorLines<L0, L1, L2>,
        edge: &'static EdgeLatch,
        delay: D,
        bias_pin: i32,
    ) -> Self {
        Self {
            adc,
            sense,
            leds,
            edge,
            delay,
            bias_pin,
        }
    }

    pub fn indicators(&self) -> &IndicatorLines<L0, L1, L2> {
        &self.leds
    }
}

// ── AnalogPort ────────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> AnalogPort for BoardHardware<A, S, L0, L1, L2, D>
where
    A: OneshotAdc,
{
    fn read_channel(&mut self, channel: AnalogChannel) -> Result<u16> {
        adc::read_probe_bits(&mut self.adc, adc_channel(channel))
    }
}

// ── LevelPort ─────────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> LevelPort for BoardHardware<A, S, L0, L1, L2, D>
where
    S: InputPin,
{
    fn read_level(&mut self) -> Result<bool> {
        self.sense
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed.into())
    }
}

// ── BiasPort ──────────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> BiasPort for BoardHardware<A, S, L0, L1, L2, D> {
    fn set_bias(&mut self, mode: BiasMode) -> Result<()> {
        if hw_init::bias_set(self.bias_pin, mode) {
            Ok(())
        } else {
            Err(ActuatorError::GpioWriteFailed.into())
        }
    }
}

// ── EdgeWatcher ───────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> EdgeWatcher for BoardHardware<A, S, L0, L1, L2, D> {
    fn arm(&mut self) -> Result<()> {
        self.edge.arm();
        if hw_init::probe_intr_enable(true) {
            Ok(())
        } else {
            self.edge.disarm();
            Err(ActuatorError::InterruptMaskFailed.into())
        }
    }

    fn disarm(&mut self) -> Result<()> {
        // Drop the latch first so a late edge cannot land after masking fails.
        self.edge.disarm();
        if hw_init::probe_intr_enable(false) {
            Ok(())
        } else {
            Err(ActuatorError::InterruptMaskFailed.into())
        }
    }

    fn consume_flag(&mut self) -> bool {
        self.edge.consume()
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> IndicatorPort for BoardHardware<A, S, L0, L1, L2, D>
where
    L0: OutputPin,
    L1: OutputPin,
    L2: OutputPin,
{
    fn show(&mut self, pattern: LinePattern) -> Result<()> {
        self.leds.show(pattern)
    }
}

// ── DelayNs ───────────────────────────────────────────────────

impl<A, S, L0, L1, L2, D> DelayNs for BoardHardware<A, S, L0, L1, L2, D>
where
    D: DelayNs,
{
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }
}
