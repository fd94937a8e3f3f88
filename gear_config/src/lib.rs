#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and recorded-readings parsing for the gear display.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config.
//! - The readings CSV loader enforces headers and rejects out-of-range counts.
use serde::Deserialize;

/// Largest raw count a 10-bit converter can produce.
pub const ADC_MAX: u16 = 1023;

/// Recorded readings CSV schema.
///
/// Expected headers:
/// g1,g2,g3,g4,g5,r
///
/// Example:
/// g1,g2,g3,g4,g5,r
/// 500,500,500,900,500,500
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ReadingRow {
    pub g1: u16,
    pub g2: u16,
    pub g3: u16,
    pub g4: u16,
    pub g5: u16,
    pub r: u16,
}

impl ReadingRow {
    /// Channel order: gears 1..5 then reverse.
    pub fn as_array(&self) -> [u16; 6] {
        [self.g1, self.g2, self.g3, self.g4, self.g5, self.r]
    }
}

impl From<ReadingRow> for [u16; 6] {
    fn from(r: ReadingRow) -> Self {
        r.as_array()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pins {
    /// ADC input index (0..=7) for gears 1..5 and reverse, in that order.
    pub adc_channels: [u8; 6],
    pub mode_button: u8,
    pub tolerance_up: u8,
    pub tolerance_down: u8,
    /// SPI bus number (0 = SPI0).
    pub spi_bus: u8,
    /// SPI slave select line (0 = CE0).
    pub spi_slave_select: u8,
    pub spi_clock_hz: u32,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            adc_channels: [0, 1, 2, 3, 4, 5],
            mode_button: 17,
            tolerance_up: 27,
            tolerance_down: 22,
            spi_bus: 0,
            spi_slave_select: 0,
            spi_clock_hz: 1_350_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    /// Per-tick mean of the six readings.
    #[default]
    Mean,
    /// Fixed ideal sensor midpoint.
    Theoretical,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverCfg {
    /// Activity threshold in raw counts, [0, 995] in steps of 5.
    pub tolerance: u16,
    pub baseline: Baseline,
}

impl Default for ResolverCfg {
    fn default() -> Self {
        Self {
            tolerance: 200,
            baseline: Baseline::Mean,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebounceCfg {
    /// Delay between confirmation polls (ms).
    pub interval_ms: u64,
    /// Consecutive active polls required to confirm a press.
    pub count: u8,
}

impl Default for DebounceCfg {
    fn default() -> Self {
        Self {
            interval_ms: 20,
            count: 6,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
    /// Minimum spacing between two dumps (ms).
    pub interval_ms: u64,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    /// Index of the mode shown at startup (0..=8).
    pub initial_mode: usize,
    /// Render Fault/Error verdicts instead of keeping the previous frame.
    pub debug: bool,
    /// Pause after a mode change before the surface is cleared (ms).
    pub mode_settle_ms: u64,
    /// Credits screen duration at startup (ms); 0 skips it.
    pub splash_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            initial_mode: 0,
            debug: true,
            mode_settle_ms: 100,
            splash_ms: 1500,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RunnerCfg {
    /// Minimum time between tick starts (ms); 0 runs free.
    pub loop_period_ms: u64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub resolver: ResolverCfg,
    pub debounce: DebounceCfg,
    pub diagnostics: DiagnosticsCfg,
    pub display: DisplayCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_readings_csv(path: &std::path::Path) -> eyre::Result<Vec<ReadingRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open readings CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["g1", "g2", "g3", "g4", "g5", "r"];
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    if actual != expected {
        eyre::bail!(
            "readings CSV must have headers 'g1,g2,g3,g4,g5,r', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ReadingRow>().enumerate() {
        let line = idx + 2;
        match rec {
            Ok(row) => {
                if let Some(v) = row.as_array().into_iter().find(|&v| v > ADC_MAX) {
                    eyre::bail!("CSV row {line}: reading {v} exceeds {ADC_MAX}");
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {line}: {e}");
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("readings CSV {:?} has no rows", path);
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pins
        if let Some(ch) = self.pins.adc_channels.iter().find(|&&c| c > 7) {
            eyre::bail!("pins.adc_channels entries must be in [0, 7], got {ch}");
        }
        for (i, a) in self.pins.adc_channels.iter().enumerate() {
            if self.pins.adc_channels[i + 1..].contains(a) {
                eyre::bail!("pins.adc_channels must be distinct (channel {a} repeated)");
            }
        }
        let buttons = [
            self.pins.mode_button,
            self.pins.tolerance_up,
            self.pins.tolerance_down,
        ];
        if buttons[0] == buttons[1] || buttons[0] == buttons[2] || buttons[1] == buttons[2] {
            eyre::bail!("pins: mode_button, tolerance_up and tolerance_down must differ");
        }
        if self.pins.spi_clock_hz == 0 {
            eyre::bail!("pins.spi_clock_hz must be > 0");
        }

        // Resolver
        if self.resolver.tolerance > 995 {
            eyre::bail!("resolver.tolerance must be in [0, 995]");
        }
        if self.resolver.tolerance % 5 != 0 {
            eyre::bail!("resolver.tolerance must be a multiple of 5");
        }

        // Debounce
        if self.debounce.count == 0 {
            eyre::bail!("debounce.count must be >= 1");
        }
        if self.debounce.interval_ms > 1000 {
            eyre::bail!("debounce.interval_ms is unreasonably large (>1s)");
        }

        // Diagnostics
        if self.diagnostics.enabled && self.diagnostics.interval_ms == 0 {
            eyre::bail!("diagnostics.interval_ms must be >= 1");
        }

        // Display
        if self.display.initial_mode > 8 {
            eyre::bail!("display.initial_mode must be in [0, 8]");
        }
        if self.display.mode_settle_ms > 10_000 {
            eyre::bail!("display.mode_settle_ms is unreasonably large (>10s)");
        }
        if self.display.splash_ms > 60_000 {
            eyre::bail!("display.splash_ms is unreasonably large (>60s)");
        }

        // Runner
        if self.runner.loop_period_ms > 60_000 {
            eyre::bail!("runner.loop_period_ms is unreasonably large (>60s)");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r:?}");
        }

        Ok(())
    }
}
