//! `From` implementations bridging `gear_config` types to `gear_core` types.
//!
//! Range checks belong to `gear_config::Config::validate` and the session
//! builder; these conversions only map shapes.

use crate::channel::Readings;
use crate::config::{DebounceCfg, DiagnosticsCfg, DisplayCfg, ResolverCfg};
use crate::mode::DisplayMode;
use crate::runner::RunParams;
use crate::stats::BaselineMethod;

// ── BaselineMethod ───────────────────────────────────────────────────────────

impl From<gear_config::Baseline> for BaselineMethod {
    fn from(b: gear_config::Baseline) -> Self {
        match b {
            gear_config::Baseline::Mean => Self::Mean,
            gear_config::Baseline::Theoretical => Self::Theoretical,
        }
    }
}

// ── ResolverCfg ──────────────────────────────────────────────────────────────

impl From<&gear_config::ResolverCfg> for ResolverCfg {
    fn from(c: &gear_config::ResolverCfg) -> Self {
        Self {
            tolerance: c.tolerance,
            baseline: c.baseline.into(),
        }
    }
}

// ── DebounceCfg ──────────────────────────────────────────────────────────────

impl From<&gear_config::DebounceCfg> for DebounceCfg {
    fn from(c: &gear_config::DebounceCfg) -> Self {
        Self {
            interval_ms: c.interval_ms,
            count: c.count,
        }
    }
}

// ── DiagnosticsCfg ───────────────────────────────────────────────────────────

impl From<&gear_config::DiagnosticsCfg> for DiagnosticsCfg {
    fn from(c: &gear_config::DiagnosticsCfg) -> Self {
        Self {
            enabled: c.enabled,
            interval_ms: c.interval_ms,
        }
    }
}

// ── DisplayCfg ───────────────────────────────────────────────────────────────

impl From<&gear_config::DisplayCfg> for DisplayCfg {
    fn from(c: &gear_config::DisplayCfg) -> Self {
        Self {
            // out-of-range indices are rejected by validate(); fall back to Basic
            initial_mode: DisplayMode::from_index(c.initial_mode).unwrap_or_default(),
            debug: c.debug,
            mode_settle_ms: c.mode_settle_ms,
            splash_ms: c.splash_ms,
        }
    }
}

// ── Readings ─────────────────────────────────────────────────────────────────

impl From<gear_config::ReadingRow> for Readings {
    fn from(r: gear_config::ReadingRow) -> Self {
        Self::new(r.as_array())
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&gear_config::RunnerCfg> for RunParams {
    fn from(c: &gear_config::RunnerCfg) -> Self {
        Self {
            loop_period_ms: c.loop_period_ms,
            max_ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_to_default_core_cfgs() {
        let cfg = gear_config::Config::default();
        let r = ResolverCfg::from(&cfg.resolver);
        assert_eq!(r.tolerance, ResolverCfg::default().tolerance);
        assert_eq!(r.baseline, BaselineMethod::Mean);
        let d = DisplayCfg::from(&cfg.display);
        assert_eq!(d.initial_mode, DisplayMode::Basic);
        assert!(d.debug);
        assert_eq!(DebounceCfg::from(&cfg.debounce).count, 6);
        assert_eq!(DiagnosticsCfg::from(&cfg.diagnostics).interval_ms, 1000);
    }

    #[test]
    fn display_mode_index_maps() {
        let c = gear_config::DisplayCfg {
            initial_mode: 6,
            ..Default::default()
        };
        assert_eq!(DisplayCfg::from(&c).initial_mode, DisplayMode::Fill);
    }
}
