//! Application core: probe orchestration, zero direct I/O.
//!
//! The per-cycle pipeline (level select, oscillation, floating check,
//! classification, display) lives in [`service`].  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
