//! Task watchdog for the measurement loop.
//!
//! The loop task subscribes itself once at boot and resets the TWDT after
//! every cycle.  A cycle that never returns (a wedged ADC driver, an edge
//! interrupt storm starving the task) panics the core after
//! [`TIMEOUT_MS`] and the chip reboots with the indicators blank.
//!
//! A normal cycle is a little over a millisecond, so the timeout only
//! has to clear boot logging and the first profile read.

use core::fmt;

use log::{info, warn};

pub const TIMEOUT_MS: u32 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogError {
    /// `esp_task_wdt_add` refused the loop task.
    SubscribeFailed(i32),
}

impl fmt::Display for WatchdogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscribeFailed(rc) => write!(f, "TWDT subscribe failed (rc={rc})"),
        }
    }
}

impl core::error::Error for WatchdogError {}

/// Subscription of the calling task.  Dropping it unsubscribes.
#[derive(Debug)]
pub struct Watchdog {
    feeds: u64,
}

impl Watchdog {
    /// Apply [`TIMEOUT_MS`] and subscribe the calling task.
    pub fn subscribe() -> Result<Self, WatchdogError> {
        if let Err(rc) = twdt::configure(TIMEOUT_MS) {
            // The bootloader may have started the TWDT already.
            warn!("watchdog: reconfigure returned {}, keeping current timeout", rc);
        }
        twdt::add_current_task().map_err(WatchdogError::SubscribeFailed)?;
        info!("watchdog: loop task subscribed, {} ms timeout", TIMEOUT_MS);
        Ok(Self { feeds: 0 })
    }

    /// Reset the countdown.  Call once per measurement cycle.
    pub fn feed(&mut self) {
        twdt::reset_current_task();
        self.feeds = self.feeds.wrapping_add(1);
    }

    /// Cycles fed since subscribing.
    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        twdt::delete_current_task();
    }
}

#[cfg(target_os = "espidf")]
mod twdt {
    use esp_idf_svc::sys::*;

    fn check(rc: esp_err_t) -> Result<(), i32> {
        if rc == ESP_OK as i32 { Ok(()) } else { Err(rc) }
    }

    pub fn configure(timeout_ms: u32) -> Result<(), i32> {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        check(unsafe { esp_task_wdt_reconfigure(&cfg) })
    }

    pub fn add_current_task() -> Result<(), i32> {
        check(unsafe { esp_task_wdt_add(core::ptr::null_mut()) })
    }

    pub fn reset_current_task() {
        unsafe {
            esp_task_wdt_reset();
        }
    }

    pub fn delete_current_task() {
        unsafe {
            esp_task_wdt_delete(core::ptr::null_mut());
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod twdt {
    pub fn configure(_timeout_ms: u32) -> Result<(), i32> {
        Ok(())
    }

    pub fn add_current_task() -> Result<(), i32> {
        Ok(())
    }

    pub fn reset_current_task() {}

    pub fn delete_current_task() {}
}
