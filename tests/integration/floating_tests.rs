//! Integration tests for floating detection and its interaction with the
//! oscillation display.

use crate::mock_hw::{LineDrive, RecordingSink, SimProbe};

use logicprobe::app::events::ProbeEvent;
use logicprobe::app::service::ProbeService;
use logicprobe::config::ProbeConfig;
use logicprobe::probe::indicator::{Indicators, LinePattern};

const FAST: LineDrive = LineDrive::Toggle { half_period_ns: 100_000 };
const FLOATING_ONLY: Indicators = Indicators {
    floating: true,
    high: false,
    low: false,
    oscillating: false,
};

fn started(config: &ProbeConfig, hw: &mut SimProbe) -> (ProbeService, RecordingSink) {
    let mut probe = ProbeService::new(config).expect("valid config");
    let mut sink = RecordingSink::new();
    probe.start(hw, &mut sink).expect("start");
    (probe, sink)
}

fn floating_changes(sink: &RecordingSink) -> Vec<bool> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            ProbeEvent::FloatingChanged(f) => Some(*f),
            _ => None,
        })
        .collect()
}

#[test]
fn undriven_line_shows_floating_only() {
    let mut hw = SimProbe::ttl(LineDrive::Floating);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");

    assert!(report.floating_measured);
    assert_eq!(report.shown, FLOATING_ONLY);
    assert_eq!(report.pattern, LinePattern::from_bits(0b100));
}

#[test]
fn repeated_checks_agree() {
    let mut hw = SimProbe::ttl(LineDrive::Floating);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    for _ in 0..5 {
        let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
        assert!(report.floating_measured);
    }
    assert_eq!(floating_changes(&sink), vec![true]);
}

#[test]
fn driven_lines_are_not_floating() {
    for drive in [LineDrive::High, LineDrive::Low, LineDrive::Voltage(500)] {
        let mut hw = SimProbe::ttl(drive);
        let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

        let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
        assert!(!report.floating_measured, "{drive:?} read as floating");
        assert!(!report.shown.floating);
    }
}

#[test]
fn connecting_a_driver_clears_floating() {
    let mut hw = SimProbe::ttl(LineDrive::Floating);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    probe.run_cycle(&mut hw, &mut sink);
    hw.drive = LineDrive::Low;
    let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");

    assert_eq!(report.pattern, LinePattern::from_bits(0b010));
    assert_eq!(floating_changes(&sink), vec![true, false]);
}

#[test]
fn active_oscillation_overrides_floating() {
    let mut hw = SimProbe::ttl(FAST);
    let (mut probe, mut sink) = started(&ProbeConfig::default(), &mut hw);

    let first = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
    assert!(first.shown.oscillating);

    hw.drive = LineDrive::Floating;
    let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");

    assert!(report.floating_measured);
    assert!(!report.shown.floating);
    assert!(report.shown.oscillating);
    // An open line settles low after the pull-down: LO + OS.
    assert_eq!(report.pattern, LinePattern::from_bits(0b011));
    assert!(floating_changes(&sink).is_empty());

    // FL returns once the OS counter has run out.
    let mut last = report;
    while probe.oscillation_remaining() > 0 {
        last = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
        assert!(!last.shown.floating);
    }
    assert_eq!(last.cycle, 50);
    let settled = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
    assert_eq!(settled.shown, FLOATING_ONLY);
    assert_eq!(floating_changes(&sink), vec![true]);
}

#[test]
fn polling_only_reports_floating_as_measured() {
    let mut hw = SimProbe::ttl(LineDrive::Low);
    let (mut probe, mut sink) = started(&ProbeConfig::polling_only(), &mut hw);

    probe.run_cycle(&mut hw, &mut sink);
    hw.drive = LineDrive::High;
    let toggled = probe.run_cycle(&mut hw, &mut sink).expect("cycle");
    assert!(toggled.shown.oscillating);

    hw.drive = LineDrive::Floating;
    let report = probe.run_cycle(&mut hw, &mut sink).expect("cycle");

    assert_eq!(report.shown, FLOATING_ONLY);
    assert_eq!(report.pattern, LinePattern::from_bits(0b100));
    // The OS counter is not spent while FL is shown.
    assert_eq!(report.oscillation_remaining, toggled.oscillation_remaining);
}
