//! Peripheral drivers and hardware initialisation.

pub mod adc;
pub mod bias;
pub mod edge_latch;
pub mod hw_init;
pub mod indicators;
pub mod watchdog;
