//! Integration tests for the transient and slow oscillation detectors and
//! the decaying OS indicator.

use crate::mock_hw::{LineDrive, Op, RecordingSink, SimProbe};

use logicprobe::app::events::ProbeEvent;
use logicprobe::app::service::{CycleReport, ProbeService};
use logicprobe::config::ProbeConfig;
use logicprobe::probe::indicator::LinePattern;
use logicprobe::probe::oscillation::OscillationSource;

/// 5 kHz square wave: ten edges inside a 1 ms window.
const FAST: LineDrive = LineDrive::Toggle { half_period_ns: 100_000 };

fn started(config: &ProbeConfig, hw: &mut SimProbe) -> (ProbeService, RecordingSink) {
    let mut probe = ProbeService::new(config).expect("valid config");
    let mut sink = RecordingSink::new();
    probe.start(hw, &mut sink).expect("start");
    hw.clear_ops();
    (probe, sink)
}

fn cycle(probe: &mut ProbeService, hw: &mut SimProbe, sink: &mut RecordingSink) -> CycleReport {
    probe.run_cycle(hw, sink).expect("cycle")
}

/// A steady drive that classifies the same as `report`.
fn steady_like(report: &CycleReport) -> LineDrive {
    if report.classification.is_high { LineDrive::High } else { LineDrive::Low }
}

fn triggers(sink: &RecordingSink, source: OscillationSource) -> usize {
    sink.count(|e| matches!(e, ProbeEvent::OscillationTriggered(s) if *s == source))
}

// ── Transient detector ───────────────────────────────────────

#[test]
fn fast_toggle_is_caught_in_the_edge_window() {
    let mut hw = SimProbe::ttl(FAST);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    let report = cycle(&mut probe, &mut hw, &mut sink);

    assert!(report.edge_seen);
    assert!(report.shown.oscillating);
    assert_eq!(report.oscillation_remaining, 49);
    // OS clears line 2 and sets line 0.
    assert!(report.pattern.line(0));
    assert!(!report.pattern.line(2));
    assert_eq!(triggers(&sink, OscillationSource::Transient), 1);
}

#[test]
fn os_indicator_decays_after_the_signal_stops() {
    let mut hw = SimProbe::ttl(FAST);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    let first = cycle(&mut probe, &mut hw, &mut sink);
    assert!(first.shown.oscillating);
    hw.drive = steady_like(&first);

    // Lit for exactly the configured 50 cycles, counting the trigger cycle.
    for n in 2..=50 {
        let report = cycle(&mut probe, &mut hw, &mut sink);
        assert!(report.shown.oscillating, "cycle {n} should still show OS");
        assert!(!report.edge_seen);
        assert_eq!(report.oscillation_remaining, (50 - n) as u8);
    }

    let after = cycle(&mut probe, &mut hw, &mut sink);
    assert!(!after.shown.oscillating);
    assert_eq!(probe.oscillation_remaining(), 0);
    let steady = if first.classification.is_high { 0b101 } else { 0b010 };
    assert_eq!(after.pattern, LinePattern::from_bits(steady));
}

#[test]
fn continuous_toggle_keeps_reloading() {
    let mut hw = SimProbe::ttl(FAST);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    for _ in 0..120 {
        let report = cycle(&mut probe, &mut hw, &mut sink);
        assert!(report.shown.oscillating);
        assert_eq!(report.oscillation_remaining, 49);
    }
}

#[test]
fn longer_decay_is_configurable() {
    let config = ProbeConfig {
        oscillation_decay_cycles: 255,
        ..ProbeConfig::default()
    };
    let mut hw = SimProbe::ttl(FAST);
    let (mut probe, mut sink) = started(&config, &mut hw);

    let report = cycle(&mut probe, &mut hw, &mut sink);
    assert_eq!(report.oscillation_remaining, 254);
}

// ── Slow detector ────────────────────────────────────────────

#[test]
fn low_to_high_between_cycles_triggers_slow_oscillation() {
    let mut hw = SimProbe::ttl(LineDrive::Low);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    let first = cycle(&mut probe, &mut hw, &mut sink);
    assert!(!first.shown.oscillating);

    hw.drive = LineDrive::High;
    let second = cycle(&mut probe, &mut hw, &mut sink);
    assert!(second.slow_toggle);
    assert!(!second.edge_seen);
    assert_eq!(second.oscillation_remaining, 49);
    // HI + OS: line 2 cleared, line 0 kept.
    assert_eq!(second.pattern, LinePattern::from_bits(0b001));
    assert_eq!(triggers(&sink, OscillationSource::Slow), 1);

    for n in 3..=51 {
        let report = cycle(&mut probe, &mut hw, &mut sink);
        assert!(report.shown.oscillating, "cycle {n} should still show OS");
        assert!(!report.slow_toggle);
    }
    let after = cycle(&mut probe, &mut hw, &mut sink);
    assert_eq!(after.pattern, LinePattern::from_bits(0b101));
}

#[test]
fn high_to_low_shows_low_with_os() {
    let mut hw = SimProbe::ttl(LineDrive::High);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    cycle(&mut probe, &mut hw, &mut sink);
    hw.drive = LineDrive::Low;
    let report = cycle(&mut probe, &mut hw, &mut sink);

    assert!(report.slow_toggle);
    assert_eq!(report.pattern, LinePattern::from_bits(0b011));
}

#[test]
fn passing_through_the_mid_band_is_not_a_toggle() {
    let mut hw = SimProbe::ttl(LineDrive::Low);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    cycle(&mut probe, &mut hw, &mut sink);
    hw.drive = LineDrive::Voltage(300);
    let mid = cycle(&mut probe, &mut hw, &mut sink);
    assert!(mid.classification.is_indeterminate());
    hw.drive = LineDrive::High;
    let high = cycle(&mut probe, &mut hw, &mut sink);

    assert!(!mid.slow_toggle);
    assert!(!high.slow_toggle);
    assert_eq!(probe.oscillation_remaining(), 0);
}

#[test]
fn prior_classification_tracks_last_cycle() {
    let mut hw = SimProbe::ttl(LineDrive::High);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    cycle(&mut probe, &mut hw, &mut sink);
    assert!(probe.prior().was_high);
    assert!(!probe.prior().was_low);
}

// ── Polling-only mode ────────────────────────────────────────

#[test]
fn polling_only_relies_on_cycle_comparison() {
    let mut hw = SimProbe::ttl(LineDrive::Low);
    let (mut probe, mut sink) = started(&ProbeConfig::polling_only(), &mut hw);

    cycle(&mut probe, &mut hw, &mut sink);
    hw.drive = LineDrive::High;
    let report = cycle(&mut probe, &mut hw, &mut sink);

    assert!(report.slow_toggle);
    assert!(report.shown.oscillating);
    assert!(!hw.ops.contains(&Op::Arm));
    assert_eq!(triggers(&sink, OscillationSource::Transient), 0);
}
