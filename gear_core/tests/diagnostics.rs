use gear_core::{
    BaselineMethod, DiagnosticReport, DisplayMode, GearVerdict, Readings, Snapshot, Tolerance,
};

fn report(raw: [u16; 6]) -> DiagnosticReport {
    let snap = Snapshot::compute(Readings::new(raw), BaselineMethod::Mean, Tolerance::default());
    DiagnosticReport::new(1, DisplayMode::Basic, Tolerance::default(), &snap)
}

#[test]
fn dump_text_for_fourth_gear() {
    let text = report([500, 500, 500, 900, 500, 500]).to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Mode: 0",
            "Total: 3400",
            "Average: 566 (566) 2.77V",
            "Tolerance: 200 0.98V",
            "In Gear: ** Fourth (4) **",
            " - Active Gear: 900 4.40V",
            " - Differential: 334",
            "Gear 1: 500 (500) 2.44V",
            "Gear 2: 500 (500) 2.44V",
            "Gear 3: 500 (500) 2.44V",
            "Gear 4: 900 (900) 4.40V",
            "Gear 5: 500 (500) 2.44V",
            "Gear R: 500 (500) 2.44V",
            "Standard Deviation: 0.73",
        ]
    );
}

#[test]
fn dump_text_without_single_active_channel() {
    let text = report([900, 900, 500, 500, 500, 500]).to_string();
    assert!(text.contains("In Gear: ** Error (E) **"));
    assert!(text.contains(" - Active Gear: N/A\n - Differential: N/A\n"));
}

#[test]
fn full_scale_values_use_plus_notation() {
    let text = report([1023, 1023, 1023, 1023, 1023, 1023]).to_string();
    assert!(text.contains("Gear 1: 1023 (+23) 5.00V"));
    assert!(text.contains("Average: 1023 (+23) 5.00V"));
}

#[test]
fn report_fields_are_consistent() {
    let r = report([500, 500, 500, 500, 500, 100]);
    assert_eq!(r.verdict, GearVerdict::Reverse);
    assert_eq!(r.verdict_code, 6);
    assert_eq!(r.verdict_symbol, 'R');
    assert_eq!(r.mode_index, 0);
    assert_eq!(r.channels.len(), 6);
    let active = r.active.expect("reverse is active");
    assert_eq!(active.raw, 100);
    assert_eq!(active.differential, 333);
}
