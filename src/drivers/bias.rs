//! Owner of the weak pull driver on the probe line.
//!
//! The transient and floating detectors both bias the probe line through
//! the same pin.  [`BiasDriver`] is the single owner of that pin's mode;
//! detectors borrow it as a [`BiasSession`] and the session always returns
//! the pin to [`BiasMode::Disconnected`], either through
//! [`BiasSession::finish`] or on drop if a step bailed out with `?`.

use log::warn;

use crate::app::ports::{BiasMode, BiasPort};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct BiasDriver {
    mode: BiasMode,
}

impl BiasDriver {
    pub const fn new() -> Self {
        Self { mode: BiasMode::Disconnected }
    }

    pub fn mode(&self) -> BiasMode {
        self.mode
    }

    /// Take control of the bias pin for a sequence of detector steps.
    pub fn session<'a, P: BiasPort>(&'a mut self, port: &'a mut P) -> BiasSession<'a, P> {
        BiasSession {
            mode: &mut self.mode,
            port,
        }
    }

    /// Force the pin to high impedance regardless of the tracked mode.
    /// Used at boot and after a failed cycle.
    pub fn release<P: BiasPort>(&mut self, port: &mut P) -> Result<()> {
        port.set_bias(BiasMode::Disconnected)?;
        self.mode = BiasMode::Disconnected;
        Ok(())
    }
}

/// Exclusive, scoped use of the bias pin plus the hardware it sits on.
pub struct BiasSession<'a, P: BiasPort> {
    mode: &'a mut BiasMode,
    port: &'a mut P,
}

impl<P: BiasPort> BiasSession<'_, P> {
    /// Switch the pin to `mode`.  Returns `true` if the pin actually
    /// changed, i.e. the caller has to wait for the line to settle.
    pub fn set(&mut self, mode: BiasMode) -> Result<bool> {
        if *self.mode == mode {
            return Ok(false);
        }
        self.port.set_bias(mode)?;
        *self.mode = mode;
        Ok(true)
    }

    pub fn mode(&self) -> BiasMode {
        *self.mode
    }

    /// The rest of the board, for level reads, delays and the edge watcher.
    pub fn port(&mut self) -> &mut P {
        &mut *self.port
    }

    /// Disconnect the bias and end the session.
    pub fn finish(mut self) -> Result<()> {
        self.set(BiasMode::Disconnected).map(|_| ())
    }
}

impl<P: BiasPort> Drop for BiasSession<'_, P> {
    fn drop(&mut self) {
        if *self.mode != BiasMode::Disconnected {
            if let Err(e) = self.set(BiasMode::Disconnected) {
                warn!("bias: release on drop failed: {}", e);
            }
        }
    }
}
