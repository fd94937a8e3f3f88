use gear_core::channel::{Channel, Readings};
use gear_core::format::{format_value, pad_left};
use gear_core::render::View;
use gear_core::resolver::GearVerdict;
use gear_core::stats::to_voltage;

use crate::{COLS, CharDisplay, Glyph, ROWS};

/// Gear names are padded so a shorter name fully covers a longer one.
const NAME_WIDTH: usize = 7;

const CREDITS: [&str; ROWS] = ["- Gear Display -", "By Eric C Menze."];

fn name(verdict: GearVerdict) -> String {
    format!("{:<width$}", verdict.name(), width = NAME_WIDTH)
}

fn volts(raw: u16) -> String {
    format!("{:.2}", to_voltage(i32::from(raw)))
}

pub(crate) fn draw(d: &mut CharDisplay, view: &View) {
    match view {
        View::Basic { verdict } => basic(d, *verdict),
        View::Advanced {
            verdict,
            active_v,
            differential_v,
            baseline_v,
        } => advanced(d, *verdict, *active_v, *differential_v, *baseline_v),
        View::Variables {
            verdict,
            std_dev_v,
            tolerance,
            tolerance_in_volts,
            baseline_v,
            debug,
        } => {
            variables(d, *verdict, *std_dev_v, *baseline_v, *debug);
            tolerance_field(d, tolerance.get(), tolerance.volts(), *tolerance_in_volts);
        }
        View::RawValues { readings } => raw_values(d, readings),
        View::RawVoltages { readings } => raw_voltages(d, readings),
        View::Fill { symbol } => fill(d, *symbol),
        View::Credits => {
            for (row, text) in CREDITS.iter().enumerate() {
                d.set_cursor(0, row);
                d.print(text);
            }
        }
        View::Blank => {}
    }
}

fn basic(d: &mut CharDisplay, verdict: GearVerdict) {
    d.set_cursor(1, 0);
    d.print(&format!(".{}.", verdict.symbol()));
    d.set_cursor(9, 0);
    d.print(" Gear");
    d.set_cursor(0, 1);
    d.print(&name(verdict));
    d.set_cursor(9, 1);
    d.print("Display");
}

fn advanced(
    d: &mut CharDisplay,
    verdict: GearVerdict,
    active_v: Option<f32>,
    differential_v: Option<f32>,
    baseline_v: f32,
) {
    d.set_cursor(2, 0);
    d.print(&verdict.symbol().to_string());

    d.set_cursor(9, 0);
    match active_v {
        Some(v) => d.print(&format!("G:{v:.2}V")),
        None => d.print("       "),
    }

    d.set_cursor(0, 1);
    d.print(&name(verdict));

    d.set_cursor(9, 1);
    match differential_v {
        Some(v) => d.print(&format!("D:{v:.2}V")),
        None => d.print(&format!("A:{baseline_v:.2}V")),
    }
}

fn variables(
    d: &mut CharDisplay,
    verdict: GearVerdict,
    std_dev_v: f32,
    baseline_v: f32,
    debug: bool,
) {
    d.set_cursor(0, 0);
    d.print(&verdict.symbol().to_string());
    d.set_cursor(2, 0);
    d.print(&name(verdict));

    d.set_cursor(10, 0);
    d.write_glyph(Glyph::Sigma);
    d.print(&format!(":{std_dev_v:.2}"));

    d.set_cursor(7, 1);
    if debug {
        d.print("D");
    }

    d.set_cursor(9, 1);
    d.print(&format!("A:{baseline_v:.2}V"));
}

fn tolerance_field(d: &mut CharDisplay, raw: u16, volts: f32, in_volts: bool) {
    d.set_cursor(0, 1);
    if in_volts {
        d.write_glyph(Glyph::TColon);
        d.print(&format!("{volts:.2}V"));
    } else {
        d.print("T:");
        d.print(&pad_left(u32::from(raw), 3));
    }
}

fn raw_values(d: &mut CharDisplay, r: &Readings) {
    d.set_cursor(0, 0);
    d.write_glyph(Glyph::OneColon);
    d.print(&format_value(r.get(Channel::Gear1)));
    d.print(" 2:");
    d.print(&format_value(r.get(Channel::Gear2)));
    d.print(" 3:");
    d.print(&format_value(r.get(Channel::Gear3)));

    d.set_cursor(0, 1);
    d.write_glyph(Glyph::FourColon);
    d.print(&format_value(r.get(Channel::Gear4)));
    d.print(" 5:");
    d.print(&format_value(r.get(Channel::Gear5)));
    d.print(" R:");
    d.print(&format_value(r.get(Channel::Reverse)));
}

fn raw_voltages(d: &mut CharDisplay, r: &Readings) {
    let rows = [
        [Channel::Gear1, Channel::Gear2, Channel::Gear3],
        [Channel::Gear4, Channel::Gear5, Channel::Reverse],
    ];
    for (row, chans) in rows.iter().enumerate() {
        d.set_cursor(0, row);
        let [a, b, c] = chans.map(|ch| volts(r.get(ch)));
        d.print(&format!("{a}V {b}V {c}"));
    }
}

fn fill(d: &mut CharDisplay, symbol: char) {
    for row in 0..ROWS {
        d.set_cursor(0, row);
        d.print(&symbol.to_string().repeat(COLS));
    }
}
