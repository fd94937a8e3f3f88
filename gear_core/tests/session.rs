use std::time::Duration;

use gear_core::mocks::{FailingSensors, RecordingRenderer, ScriptedButtons, ScriptedSensors};
use gear_core::{
    DiagnosticsCfg, DisplayCfg, DisplayMode, GearError, GearSession, GearVerdict, Readings,
    Transition, View, to_voltage,
};
use gear_traits::{Button, ManualClock};

const FOURTH: [u16; 6] = [500, 500, 500, 900, 500, 500];
const TWO_ACTIVE: [u16; 6] = [900, 900, 500, 500, 500, 500];

fn session_with(
    sensors: ScriptedSensors,
    buttons: ScriptedButtons,
    clock: &ManualClock,
    display: DisplayCfg,
) -> GearSession {
    GearSession::builder()
        .with_sensors(sensors)
        .with_buttons(buttons)
        .with_display(display)
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("valid session")
}

#[test]
fn verdict_is_fault_until_first_tick() {
    let clock = ManualClock::new();
    let mut s = session_with(
        ScriptedSensors::constant(FOURTH),
        ScriptedButtons::new(),
        &clock,
        DisplayCfg::default(),
    );
    assert_eq!(s.verdict(), GearVerdict::Fault);
    assert!(s.last_snapshot().is_none());

    let mut r = RecordingRenderer::default();
    let out = s.tick(&mut r).expect("tick");
    assert_eq!(out.snapshot.resolution.verdict, GearVerdict::Gear4);
    assert_eq!(out.transition, Transition::None);
    assert_eq!(s.verdict(), GearVerdict::Gear4);
    assert_eq!(s.ticks(), 1);
    assert_eq!(
        r.views,
        vec![View::Basic {
            verdict: GearVerdict::Gear4
        }]
    );
}

#[test]
fn mode_press_settles_clears_and_switches_view() {
    let clock = ManualClock::new();
    let mut s = session_with(
        ScriptedSensors::constant(FOURTH),
        ScriptedButtons::new().press(Button::Mode, 7),
        &clock,
        DisplayCfg::default(),
    );
    let mut r = RecordingRenderer::default();
    let out = s.tick(&mut r).expect("tick");

    assert_eq!(
        out.transition,
        Transition::ModeChanged {
            from: DisplayMode::Basic,
            to: DisplayMode::Advanced
        }
    );
    assert_eq!(r.clears, 1);
    // 6 debounce polls of 20 ms, then the 100 ms settle
    assert_eq!(clock.elapsed(), Duration::from_millis(220));
    assert_eq!(
        r.views,
        vec![View::Advanced {
            verdict: GearVerdict::Gear4,
            active_v: Some(to_voltage(900)),
            differential_v: Some(to_voltage(334)),
            baseline_v: to_voltage(566),
        }]
    );
}

#[test]
fn one_press_per_tick_in_scan_order() {
    let clock = ManualClock::new();
    let buttons = ScriptedButtons::new()
        .press(Button::Mode, 7)
        .press(Button::ToleranceUp, 7);
    let mut s = session_with(
        ScriptedSensors::constant(FOURTH),
        buttons,
        &clock,
        DisplayCfg::default(),
    );
    let mut r = RecordingRenderer::default();

    let first = s.tick(&mut r).expect("tick");
    assert!(matches!(first.transition, Transition::ModeChanged { .. }));
    assert_eq!(s.tolerance().get(), 200);

    let second = s.tick(&mut r).expect("tick");
    assert!(matches!(second.transition, Transition::ToleranceChanged { .. }));
    assert_eq!(s.tolerance().get(), 205);
    assert_eq!(s.mode(), DisplayMode::Advanced);
    assert_eq!(r.clears, 1);
}

#[test]
fn tolerance_press_changes_resolution_threshold() {
    let clock = ManualClock::new();
    // gear 4 deviates from the mean by 334
    let mut buttons = ScriptedButtons::new();
    for _ in 0..27 {
        buttons = buttons.press(Button::ToleranceUp, 7);
    }
    let mut s = session_with(
        ScriptedSensors::constant(FOURTH),
        buttons,
        &clock,
        DisplayCfg::default(),
    );
    let mut r = RecordingRenderer::default();
    for _ in 0..26 {
        s.tick(&mut r).expect("tick");
    }
    assert_eq!(s.verdict(), GearVerdict::Gear4);
    s.tick(&mut r).expect("tick");
    // 200 + 27 * 5 = 335 > 334
    assert_eq!(s.tolerance().get(), 335);
    assert_eq!(s.verdict(), GearVerdict::Neutral);
}

#[test]
fn failures_are_not_rendered_without_debug() {
    let clock = ManualClock::new();
    let display = DisplayCfg {
        debug: false,
        ..DisplayCfg::default()
    };
    let mut s = session_with(
        ScriptedSensors::new([FOURTH, TWO_ACTIVE]),
        ScriptedButtons::new(),
        &clock,
        display,
    );
    let mut r = RecordingRenderer::default();

    assert!(s.tick(&mut r).expect("tick").rendered);
    let out = s.tick(&mut r).expect("tick");
    assert_eq!(out.snapshot.resolution.verdict, GearVerdict::Error);
    assert!(!out.rendered);
    assert_eq!(r.views.len(), 1);
}

#[test]
fn failures_are_rendered_with_debug() {
    let clock = ManualClock::new();
    let mut s = session_with(
        ScriptedSensors::constant(TWO_ACTIVE),
        ScriptedButtons::new(),
        &clock,
        DisplayCfg::default(),
    );
    let mut r = RecordingRenderer::default();
    assert!(s.tick(&mut r).expect("tick").rendered);
    assert_eq!(
        r.views,
        vec![View::Basic {
            verdict: GearVerdict::Error
        }]
    );
}

#[test]
fn diagnostics_are_rate_limited_on_the_session_clock() {
    let clock = ManualClock::new();
    let mut s = session_with(
        ScriptedSensors::constant(FOURTH),
        ScriptedButtons::new(),
        &clock,
        DisplayCfg::default(),
    );
    let mut r = RecordingRenderer::default();

    let first = s.tick(&mut r).expect("tick");
    assert_eq!(first.diagnostic.as_ref().map(|d| d.tick), Some(1));
    assert!(s.tick(&mut r).expect("tick").diagnostic.is_none());

    clock.advance(Duration::from_millis(999));
    assert!(s.tick(&mut r).expect("tick").diagnostic.is_none());
    clock.advance(Duration::from_millis(1));
    let due = s.tick(&mut r).expect("tick");
    let report = due.diagnostic.expect("report due");
    assert_eq!(report.tick, 4);
    assert_eq!(report.verdict, GearVerdict::Gear4);
    assert_eq!(report.mean, 566);
}

#[test]
fn disabled_diagnostics_never_emit() {
    let clock = ManualClock::new();
    let mut s = GearSession::builder()
        .with_sensors(ScriptedSensors::constant(FOURTH))
        .with_buttons(ScriptedButtons::new())
        .with_diagnostics(DiagnosticsCfg {
            enabled: false,
            interval_ms: 0,
        })
        .with_clock(Box::new(clock.clone()))
        .build()
        .expect("valid session");
    let mut r = RecordingRenderer::default();
    for _ in 0..3 {
        assert!(s.tick(&mut r).expect("tick").diagnostic.is_none());
        clock.advance(Duration::from_secs(2));
    }
}

#[test]
fn initial_mode_is_honoured() {
    let clock = ManualClock::new();
    let display = DisplayCfg {
        initial_mode: DisplayMode::Fill,
        ..DisplayCfg::default()
    };
    let mut s = session_with(
        ScriptedSensors::constant([500; 6]),
        ScriptedButtons::new(),
        &clock,
        display,
    );
    let mut r = RecordingRenderer::default();
    s.tick(&mut r).expect("tick");
    assert_eq!(r.views, vec![View::Fill { symbol: 'N' }]);
}

#[test]
fn replayed_readings_skip_the_sensors() {
    let clock = ManualClock::new();
    let mut s = GearSession::builder()
        .with_sensors(FailingSensors)
        .with_buttons(ScriptedButtons::new())
        .with_clock(Box::new(clock))
        .build()
        .expect("valid session");
    let mut r = RecordingRenderer::default();
    let out = s.tick_with_readings(Readings::new([500, 500, 500, 500, 500, 100]), &mut r);
    assert_eq!(out.snapshot.resolution.verdict, GearVerdict::Reverse);
}

#[test]
fn sensor_failure_maps_to_typed_error() {
    let clock = ManualClock::new();
    let mut s = GearSession::builder()
        .with_sensors(FailingSensors)
        .with_buttons(ScriptedButtons::new())
        .with_clock(Box::new(clock))
        .build()
        .expect("valid session");
    let mut r = RecordingRenderer::default();
    let err = s.tick(&mut r).expect_err("sensor failure");
    match err.downcast_ref::<GearError>() {
        Some(GearError::Io(msg)) => assert!(msg.contains("adc offline")),
        other => panic!("expected GearError::Io, got: {other:?}"),
    }
    assert!(format!("{err:#}").contains("sampling hall sensors"));
    assert_eq!(s.ticks(), 0);
    assert!(r.views.is_empty());
}
