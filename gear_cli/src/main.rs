mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use gear_config::Config;
use gear_core::error::GearError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error report handler: {e}");
    }

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        tracing::error!(error = %format!("{err:#}"), "exiting with error");
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging);
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            ticks,
            show_display,
            log_diagnostics,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;
            run::run_live(&cfg, ticks, show_display, log_diagnostics, cli.json, &shutdown)
        }
        Commands::Replay {
            csv,
            show_display,
            log_diagnostics,
        } => run::run_replay(&cfg, &csv, show_display, log_diagnostics, cli.json),
        Commands::Resolve {
            readings,
            tolerance,
            baseline,
        } => run::resolve_once(&cfg, &readings, tolerance, baseline, cli.json),
        Commands::SelfCheck => run::self_check(&cfg, cli.json),
    }
}

/// Read and validate the config; a missing file means all defaults.
fn load_config(path: &Path) -> Result<Config> {
    let cfg = if path.exists() {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read config {}", path.display()))?;
        gear_config::load_toml(&text).wrap_err_with(|| format!("parse config {}", path.display()))?
    } else {
        Config::default()
    };
    cfg.validate()
        .map_err(|e| eyre::Report::new(GearError::Config(e.to_string())))?;
    Ok(cfg)
}

/// Console logs go to stderr (pretty or JSON); `[logging].file` adds a JSON
/// file sink. `RUST_LOG` wins over `--log-level`, which wins over
/// `[logging].level`.
fn init_tracing(json: bool, cli_level: Option<&str>, logging: &gear_config::Logging) {
    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "gear.log".into(), |n| n.to_os_string());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_ansi(false).with_writer(writer)
    });

    let init = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(file_layer)
        .try_init();
    if let Err(e) = init {
        eprintln!("tracing already initialized: {e}");
    }
}
