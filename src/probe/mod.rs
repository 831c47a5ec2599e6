//! Probe measurement stages.
//!
//! Each stage is a small, hardware-agnostic piece; the
//! [`ProbeService`](crate::app::service::ProbeService) runs them in order:
//!
//! ```text
//! threshold ─▶ oscillation (transient) ─▶ floating ─▶ classify
//!           ─▶ oscillation (slow) ─▶ indicator
//! ```

pub mod classify;
pub mod floating;
pub mod indicator;
pub mod oscillation;
pub mod threshold;
