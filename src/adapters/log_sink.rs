//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured probe events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info};

use crate::app::events::ProbeEvent;
use crate::app::ports::EventSink;
use crate::probe::classify::Classification;

/// Adapter that logs every [`ProbeEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn level_name(c: Classification) -> &'static str {
    match (c.is_high, c.is_low) {
        (true, _) => "HIGH",
        (_, true) => "LOW",
        _ => "MID",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ProbeEvent) {
        match event {
            ProbeEvent::Reading(r) => {
                info!(
                    "PROBE | #{} | {:?} {}/{} | raw={} {} | float={} edge={} toggle={} | \
                     osc={} | leds=0b{:03b}",
                    r.cycle,
                    r.family,
                    r.profile.low,
                    r.profile.high,
                    r.sample.raw,
                    level_name(r.classification),
                    r.floating_measured,
                    r.edge_seen,
                    r.slow_toggle,
                    r.oscillation_remaining,
                    r.pattern.bits(),
                );
            }
            ProbeEvent::ProfileChanged { from, to } => {
                info!("LEVEL | {:?} -> {:?}", from, to);
            }
            ProbeEvent::OscillationTriggered(source) => {
                info!("OSC   | triggered ({:?})", source);
            }
            ProbeEvent::FloatingChanged(floating) => {
                info!("FLOAT | {}", if *floating { "open" } else { "driven" });
            }
            ProbeEvent::HardwareFault(e) => {
                error!("FAULT | {}", e);
            }
            ProbeEvent::Started(mode) => {
                info!("START | mode={:?}", mode);
            }
        }
    }
}
