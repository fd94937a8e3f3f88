//! Command implementations: hardware assembly, session wiring and output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::{Result, WrapErr};
use gear_config::Config;
use gear_core::error::GearError;
use gear_core::mocks::{ScriptedButtons, ScriptedSensors};
use gear_core::render::{Renderer, View};
use gear_core::{
    BaselineMethod, DiagnosticReport, DiagnosticSink, GearSession, Readings, RunParams,
    RunSummary, Snapshot, Tolerance, TracingSink,
};
use gear_traits::{ButtonPins, HallSensors};
use gear_ui::CharDisplay;
use serde_json::json;

use crate::cli::BaselineArg;

/// Fixes the simulated shift lever: `n` for neutral, `1`..`5`, or `r`.
pub const SIM_POSITION_ENV: &str = "GEAR_SIM_POSITION";

/// Prints each diagnostic dump to stdout, as text or one JSON object per line.
pub struct StdoutSink {
    json: bool,
}

impl StdoutSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl DiagnosticSink for StdoutSink {
    fn emit(&mut self, report: &DiagnosticReport) {
        let mut out = std::io::stdout().lock();
        let res = if self.json {
            match serde_json::to_string(&json!({ "diagnostics": report })) {
                Ok(line) => writeln!(out, "{line}"),
                Err(e) => {
                    tracing::warn!(error = %e, "diagnostics not serializable");
                    Ok(())
                }
            }
        } else {
            write!(out, "{report}")
        };
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to write diagnostics");
        }
    }
}

/// Diagnostics go to stdout unless `to_log` routes them through `tracing`.
fn diagnostic_sink(to_log: bool, json: bool) -> Box<dyn DiagnosticSink> {
    if to_log {
        Box::new(TracingSink)
    } else {
        Box::new(StdoutSink::new(json))
    }
}

/// `CharDisplay` that optionally echoes itself to stdout after each frame.
pub struct ConsoleDisplay {
    display: CharDisplay,
    echo: bool,
}

impl ConsoleDisplay {
    pub fn new(echo: bool) -> Self {
        Self {
            display: CharDisplay::new(),
            echo,
        }
    }
}

impl Renderer for ConsoleDisplay {
    fn clear(&mut self) {
        self.display.clear();
    }

    fn render(&mut self, view: &View) {
        self.display.render(view);
        if self.echo && !matches!(view, View::Blank) {
            println!("{}", self.display);
        }
    }
}

#[cfg_attr(all(feature = "hardware", target_os = "linux"), allow(dead_code))]
fn parse_sim_position(s: &str) -> Result<Option<usize>> {
    match s.trim().to_ascii_lowercase().as_str() {
        "n" | "neutral" => Ok(None),
        "r" | "reverse" => Ok(Some(5)),
        other => match other.parse::<usize>() {
            Ok(g @ 1..=5) => Ok(Some(g - 1)),
            _ => eyre::bail!("{SIM_POSITION_ENV} must be n, 1..5 or r, got {s:?}"),
        },
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn open_hardware(cfg: &Config) -> Result<(Box<dyn HallSensors>, Box<dyn ButtonPins>)> {
    let adc = gear_hardware::Mcp3008::new(
        cfg.pins.spi_bus,
        cfg.pins.spi_slave_select,
        cfg.pins.spi_clock_hz,
        cfg.pins.adc_channels,
    )
    .wrap_err("open mcp3008")?;
    let buttons = gear_hardware::GpioButtons::new(
        cfg.pins.mode_button,
        cfg.pins.tolerance_up,
        cfg.pins.tolerance_down,
    )
    .wrap_err("open button pins")?;
    Ok((Box::new(adc), Box::new(buttons)))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn open_hardware(_cfg: &Config) -> Result<(Box<dyn HallSensors>, Box<dyn ButtonPins>)> {
    let mut sensors = gear_hardware::SimulatedSensors::new();
    if let Ok(pos) = std::env::var(SIM_POSITION_ENV) {
        sensors = sensors.fixed(parse_sim_position(&pos)?);
    }
    tracing::info!(fixed = sensors.position().is_some(), "using simulated hardware");
    Ok((
        Box::new(sensors),
        Box::new(gear_hardware::SimulatedButtons::new()),
    ))
}

fn session_from_config(
    cfg: &Config,
    sensors: impl HallSensors + 'static,
    buttons: impl ButtonPins + 'static,
) -> Result<GearSession> {
    GearSession::builder()
        .with_sensors(sensors)
        .with_buttons(buttons)
        .with_resolver((&cfg.resolver).into())
        .with_debounce((&cfg.debounce).into())
        .with_diagnostics((&cfg.diagnostics).into())
        .with_display((&cfg.display).into())
        .build()
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "summary": {
                    "ticks": summary.ticks,
                    "verdict": summary.last_verdict.name(),
                    "symbol": summary.last_verdict.symbol().to_string(),
                    "verdict_changes": summary.verdict_changes,
                    "diagnostics": summary.diagnostics_emitted,
                    "mode": summary.mode,
                    "tolerance": summary.tolerance,
                    "uptime_ms": summary.uptime_ms,
                }
            })
        );
    } else {
        println!(
            "ticks: {}  verdict: {} ({})  changes: {}  mode: {}  tolerance: {}",
            summary.ticks,
            summary.last_verdict.name(),
            summary.last_verdict.symbol(),
            summary.verdict_changes,
            summary.mode,
            summary.tolerance.get()
        );
    }
}

pub fn run_live(
    cfg: &Config,
    ticks: Option<u64>,
    show_display: bool,
    log_diagnostics: bool,
    json: bool,
    shutdown: &Arc<AtomicBool>,
) -> Result<()> {
    let (sensors, buttons) = open_hardware(cfg)?;
    let mut session = session_from_config(cfg, sensors, buttons)?;
    let mut display = ConsoleDisplay::new(show_display);
    let mut sink = diagnostic_sink(log_diagnostics, json);
    let mut params: RunParams = (&cfg.runner).into();
    params.max_ticks = ticks;

    let summary = gear_core::run(&mut session, &mut display, &mut sink, &params, shutdown)?;
    print_summary(&summary, json);
    Ok(())
}

pub fn run_replay(
    cfg: &Config,
    csv: &Path,
    show_display: bool,
    log_diagnostics: bool,
    json: bool,
) -> Result<()> {
    let rows = gear_config::load_readings_csv(csv)
        .wrap_err_with(|| format!("load readings from {}", csv.display()))?;
    tracing::info!(rows = rows.len(), "replaying recorded readings");
    // Recorded frames carry no button activity.
    let mut session =
        session_from_config(cfg, ScriptedSensors::default(), ScriptedButtons::new())?;
    let mut display = ConsoleDisplay::new(show_display);
    let mut sink = diagnostic_sink(log_diagnostics, json);
    let summary = gear_core::replay(&mut session, rows, &mut display, &mut sink);
    print_summary(&summary, json);
    Ok(())
}

pub fn resolve_once(
    cfg: &Config,
    readings: &[u16],
    tolerance: Option<u16>,
    baseline: Option<BaselineArg>,
    json: bool,
) -> Result<()> {
    let raw: [u16; 6] = readings
        .try_into()
        .map_err(|_| eyre::eyre!("expected 6 readings, got {}", readings.len()))?;
    let raw_tol = tolerance.unwrap_or(cfg.resolver.tolerance);
    let tol = Tolerance::new(raw_tol)
        .filter(|t| t.get() % gear_core::TOLERANCE_STEP == 0)
        .ok_or_else(|| {
            eyre::Report::new(GearError::Config(format!(
                "tolerance {raw_tol} must be a multiple of {} in [{}, {}]",
                gear_core::TOLERANCE_STEP,
                gear_core::TOLERANCE_MIN,
                gear_core::TOLERANCE_MAX
            )))
        })?;
    let method = match baseline {
        Some(BaselineArg::Mean) => BaselineMethod::Mean,
        Some(BaselineArg::Theoretical) => BaselineMethod::Theoretical,
        None => cfg.resolver.baseline.into(),
    };

    let snap = Snapshot::compute(Readings::new(raw), method, tol);
    let res = &snap.resolution;
    tracing::debug!(?raw, tolerance = tol.get(), verdict = %res.verdict, "resolved");

    if json {
        println!(
            "{}",
            json!({
                "verdict": res.verdict.name(),
                "symbol": res.verdict.symbol().to_string(),
                "code": res.verdict.code(),
                "active_count": res.active_count,
                "active": res.active,
                "differential": res.differential,
                "total": snap.stats.total,
                "mean": snap.stats.mean,
                "baseline": snap.stats.baseline,
                "std_dev_v": snap.stats.std_dev_v,
                "tolerance": tol,
            })
        );
    } else {
        println!("{} ({})", res.verdict.name(), res.verdict.symbol());
        println!(
            "baseline: {}  tolerance: {}  active: {}",
            snap.stats.baseline,
            tol.get(),
            res.active_count
        );
        if let (Some(ch), Some(d)) = (res.active, res.differential) {
            println!("active channel: {}  differential: {d}", ch.label());
        }
        println!("standard deviation: {:.2}V", snap.stats.std_dev_v);
    }
    Ok(())
}

pub fn self_check(cfg: &Config, json: bool) -> Result<()> {
    let (mut sensors, mut buttons) = open_hardware(cfg)?;
    let raw = sensors
        .sample()
        .map_err(|e| eyre::Report::new(gear_core::hw_error::map_hw_error_dyn(&*e)))
        .wrap_err("sampling hall sensors")?;
    let pressed: Vec<String> = gear_traits::Button::SCAN_ORDER
        .into_iter()
        .filter(|&b| buttons.level(b) == gear_traits::Level::Low)
        .map(|b| format!("{b:?}"))
        .collect();
    if json {
        println!("{}", json!({ "ok": true, "readings": raw, "pressed": pressed }));
    } else {
        println!("self-check ok: readings {raw:?}, pressed {pressed:?}");
    }
    Ok(())
}
