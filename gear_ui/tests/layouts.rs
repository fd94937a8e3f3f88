use gear_core::mocks::{ScriptedButtons, ScriptedSensors};
use gear_core::render::{Renderer, View};
use gear_core::{
    DisplayCfg, DisplayMode, GearSession, GearVerdict, Readings, Tolerance, to_voltage,
};
use gear_traits::ManualClock;
use gear_ui::{COLS, Cell, CharDisplay, Glyph};
use rstest::rstest;

const FOURTH: [u16; 6] = [500, 500, 500, 900, 500, 500];

fn drawn(view: &View) -> [String; 2] {
    let mut d = CharDisplay::new();
    d.render(view);
    d.lines()
}

#[test]
fn basic_layout() {
    let lines = drawn(&View::Basic {
        verdict: GearVerdict::Gear4,
    });
    assert_eq!(lines[0], " .4.      Gear  ");
    assert_eq!(lines[1], "Fourth   Display");
}

#[test]
fn advanced_in_gear_shows_gear_and_differential_volts() {
    let lines = drawn(&View::Advanced {
        verdict: GearVerdict::Gear4,
        active_v: Some(to_voltage(900)),
        differential_v: Some(to_voltage(334)),
        baseline_v: to_voltage(566),
    });
    assert_eq!(lines[0], "  4      G:4.40V");
    assert_eq!(lines[1], "Fourth   D:1.63V");
}

#[test]
fn advanced_out_of_gear_shows_average() {
    let lines = drawn(&View::Advanced {
        verdict: GearVerdict::Neutral,
        active_v: None,
        differential_v: None,
        baseline_v: to_voltage(511),
    });
    assert_eq!(lines[0], format!("  N{}", " ".repeat(13)));
    assert_eq!(lines[1], "Neutral  A:2.50V");
}

#[rstest]
#[case::volts(true, "ᵀ0.98V D A:2.77V")]
#[case::raw(false, "T:200  D A:2.77V")]
fn variables_layout(#[case] in_volts: bool, #[case] bottom: &str) {
    let lines = drawn(&View::Variables {
        verdict: GearVerdict::Gear4,
        std_dev_v: 0.7286,
        tolerance: Tolerance::default(),
        tolerance_in_volts: in_volts,
        baseline_v: to_voltage(566),
        debug: true,
    });
    assert_eq!(lines[0], "4 Fourth  Σ:0.73");
    assert_eq!(lines[1], bottom);
}

#[test]
fn variables_without_debug_leaves_flag_cell_empty() {
    let mut d = CharDisplay::new();
    d.render(&View::Variables {
        verdict: GearVerdict::Neutral,
        std_dev_v: 0.0,
        tolerance: Tolerance::new(5).expect("in range"),
        tolerance_in_volts: false,
        baseline_v: 0.0,
        debug: false,
    });
    assert_eq!(d.lines()[1], "T:005    A:0.00V");
    assert_eq!(d.cell(10, 0), Some(Cell::Glyph(Glyph::Sigma)));
}

#[test]
fn raw_values_use_custom_glyphs() {
    let mut d = CharDisplay::new();
    d.render(&View::RawValues {
        readings: Readings::new([1023, 0, 42, 900, 500, 999]),
    });
    assert_eq!(d.lines()[0], "¹+23 2:000 3:042");
    assert_eq!(d.lines()[1], "⁴900 5:500 R:999");
    assert_eq!(d.cell(0, 0), Some(Cell::Glyph(Glyph::OneColon)));
    assert_eq!(d.cell(0, 1), Some(Cell::Glyph(Glyph::FourColon)));
}

#[test]
fn raw_voltages_layout() {
    let lines = drawn(&View::RawVoltages {
        readings: Readings::new(FOURTH),
    });
    assert_eq!(lines[0], "2.44V 2.44V 2.44");
    assert_eq!(lines[1], "4.40V 2.44V 2.44");
}

#[test]
fn fill_and_credits() {
    let lines = drawn(&View::Fill { symbol: 'R' });
    assert_eq!(lines[0], "R".repeat(COLS));
    assert_eq!(lines[1], "R".repeat(COLS));

    let lines = drawn(&View::Credits);
    assert_eq!(lines[0], "- Gear Display -");
    assert_eq!(lines[1].chars().count(), COLS);
}

#[test]
fn session_drives_display_through_mode_change() {
    let clock = ManualClock::new();
    let mut s = GearSession::builder()
        .with_sensors(ScriptedSensors::constant(FOURTH))
        .with_buttons(ScriptedButtons::new().press(gear_traits::Button::Mode, 7))
        .with_display(DisplayCfg {
            initial_mode: DisplayMode::Fill,
            ..DisplayCfg::default()
        })
        .with_clock(Box::new(clock))
        .build()
        .expect("valid session");
    let mut d = CharDisplay::new();
    d.render(&View::Fill { symbol: 'X' });

    // Fill -> Credits; the clear wipes the old fill first
    s.tick(&mut d).expect("tick");
    assert_eq!(s.mode(), DisplayMode::Credits);
    assert_eq!(d.lines()[0], "- Gear Display -");

    s.splash(&mut d);
    assert_eq!(d.lines()[0], " ".repeat(COLS));
}
