//! Outbound probe events.
//!
//! The [`ProbeService`](super::service::ProbeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Only changes and periodic
//! snapshots are emitted; the loop runs far too often to log every cycle.

use super::service::CycleReport;
use crate::config::DetectionMode;
use crate::error::Error;
use crate::probe::oscillation::OscillationSource;
use crate::probe::threshold::LogicFamily;

/// Structured events emitted by the probe core.
#[derive(Debug, Clone)]
pub enum ProbeEvent {
    /// The service has started (bias released, LEDs blanked).
    Started(DetectionMode),

    /// The level-select switch moved (or was read for the first time).
    ProfileChanged {
        from: Option<LogicFamily>,
        to: LogicFamily,
    },

    /// One of the detectors reloaded the oscillation counter.
    OscillationTriggered(OscillationSource),

    /// The displayed floating state flipped.
    FloatingChanged(bool),

    /// Periodic snapshot of the latest cycle.
    Reading(CycleReport),

    /// A cycle was abandoned because a peripheral failed.
    HardwareFault(Error),
}
