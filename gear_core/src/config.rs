//! Configuration types for the gear engine.
//!
//! These are the runtime configuration structs used by `SessionCore`.
//! They are separate from the TOML-deserialized config in `gear_config`.

use crate::mode::{DEFAULT_TOLERANCE, DisplayMode};
use crate::stats::BaselineMethod;

/// Gear resolution settings.
#[derive(Debug, Clone)]
pub struct ResolverCfg {
    /// Initial activity threshold in raw counts. Range [0, 995], step 5.
    pub tolerance: u16,
    /// Reference used to measure channel deviation.
    pub baseline: BaselineMethod,
}

impl Default for ResolverCfg {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            baseline: BaselineMethod::Mean,
        }
    }
}

/// Button debounce timing.
#[derive(Debug, Clone)]
pub struct DebounceCfg {
    /// Delay before each confirmation poll (ms).
    pub interval_ms: u64,
    /// Number of consecutive active polls required to confirm a press.
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

/// Periodic diagnostic dump.
#[derive(Debug, Clone)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
    /// Minimum spacing between dumps (ms).
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

/// Display behaviour.
#[derive(Debug, Clone)]
pub struct DisplayCfg {
    pub initial_mode: DisplayMode,
    /// When false, ticks resolving to `Fault` or `Error` are not rendered and
    /// the last good frame stays on screen.
    pub debug: bool,
    /// Pause after a mode change before the surface is cleared (ms).
    pub mode_settle_ms: u64,
    /// How long the credits screen is shown before the loop starts (ms).
    pub splash_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            initial_mode: DisplayMode::Basic,
            debug: true,
            mode_settle_ms: 100,
            splash_ms: 1500,
        }
    }
}
