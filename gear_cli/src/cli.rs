//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gear", version, about = "Gear position display")]
pub struct Cli {
    /// Path to config TOML (defaults are used when the file does not exist)
    #[arg(long, value_name = "FILE", default_value = "etc/gear_config.toml")]
    pub config: PathBuf,

    /// Emit results, diagnostics and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum BaselineArg {
    /// Mean of the six readings
    Mean,
    /// Fixed sensor midpoint (511)
    Theoretical,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the display loop until Ctrl-C (or for a number of ticks)
    Run {
        /// Stop after this many ticks
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Print the 16x2 display after every frame
        #[arg(long, action = ArgAction::SetTrue)]
        show_display: bool,
        /// Send diagnostic dumps to the log instead of stdout
        #[arg(long, action = ArgAction::SetTrue)]
        log_diagnostics: bool,
    },
    /// Feed recorded readings (CSV with headers g1,g2,g3,g4,g5,r) through the engine
    Replay {
        #[arg(long, value_name = "FILE")]
        csv: PathBuf,
        /// Print the 16x2 display after every frame
        #[arg(long, action = ArgAction::SetTrue)]
        show_display: bool,
        /// Send diagnostic dumps to the log instead of stdout
        #[arg(long, action = ArgAction::SetTrue)]
        log_diagnostics: bool,
    },
    /// Resolve a single set of readings: gears 1..5 then reverse
    Resolve {
        #[arg(
            num_args = 6,
            required = true,
            value_name = "RAW",
            value_parser = clap::value_parser!(u16).range(0..=1023)
        )]
        readings: Vec<u16>,
        /// Activity threshold in raw counts (multiple of 5, at most 995); defaults to config
        #[arg(long, value_name = "RAW")]
        tolerance: Option<u16>,
        /// Baseline the deviations are measured against; defaults to config
        #[arg(long, value_enum)]
        baseline: Option<BaselineArg>,
    },
    /// Quick health check (config, sensors, buttons)
    SelfCheck,
}
