//! Logic Probe Firmware: Main Entry Point
//!
//! One tight loop, one measurement cycle per iteration.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  BoardHardware                         LogEventSink        │
//! │  (Analog · Level · Bias · Edge ·       (EventSink)         │
//! │   Indicators · Delay)                                      │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │            ProbeService (pure logic)             │      │
//! │  │  select · transient · floating · classify ·      │      │
//! │  │  slow oscillation · encode                       │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  Edge ISR → EdgeLatch (atomic)    Task watchdog            │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use logicprobe::adapters::hardware::Board;
use logicprobe::adapters::log_sink::LogEventSink;
use logicprobe::app::service::ProbeService;
use logicprobe::config::ProbeConfig;
use logicprobe::drivers::hw_init;
use logicprobe::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LogicProbe v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // The watchdog is not armed yet; this halts until power-cycled.
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = ProbeConfig::default();
    let mut probe = ProbeService::new(&config)?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = Board::on_pins();
    let mut log_sink = LogEventSink::new();

    // Indicators off, bias released.
    probe.start(&mut hw, &mut log_sink)?;

    let mut watchdog = match Watchdog::subscribe() {
        Ok(wdt) => Some(wdt),
        Err(e) => {
            log::warn!("{}, running unguarded", e);
            None
        }
    };
    info!("Probe ready. Entering measurement loop.");

    // ── 5. Measurement loop ───────────────────────────────────
    loop {
        // Faults are reported through the sink; the next cycle starts clean.
        let _ = probe.run_cycle(&mut hw, &mut log_sink);
        if let Some(wdt) = watchdog.as_mut() {
            wdt.feed();
        }
    }
}
