//! ISR-fed edge latch on the probe line.
//!
//! ## Hardware
//!
//! The probe sense GPIO has an any-edge interrupt.  The ISR calls
//! [`probe_edge_isr_handler`], which sets a flag in [`PROBE_EDGE`] if the
//! latch is armed.  Nothing else runs in interrupt context.
//!
//! ## Ownership
//!
//! The main loop arms the latch, waits out the window, disarms it and only
//! then reads the flag.  The ISR's single store can therefore never race a
//! read-modify-write in the loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// Armed flag + pending-edge flag, both lock-free.
pub struct EdgeLatch {
    armed: AtomicBool,
    pending: AtomicBool,
}

/// The latch wired to the probe sense pin's interrupt.
pub static PROBE_EDGE: EdgeLatch = EdgeLatch::new();

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Record an edge.  Ignored while disarmed.
    /// Safe to call from interrupt context.
    pub fn signal(&self) {
        if self.armed.load(Ordering::Acquire) {
            self.pending.store(true, Ordering::Release);
        }
    }

    /// Return and clear the pending flag.
    pub fn consume(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// ISR handler. Register this on the probe sense pin, any edge.
/// Lock-free.
pub fn probe_edge_isr_handler() {
    PROBE_EDGE.signal();
}
