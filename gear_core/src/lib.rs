#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Gear resolution engine (hardware-agnostic).
//!
//! This crate decides, once per control-loop tick, which gear a manual
//! transmission is in from six Hall-effect sensor readings. All hardware
//! interactions go through `gear_traits::HallSensors` and
//! `gear_traits::ButtonPins`; output goes through the `Renderer` and
//! `DiagnosticSink` traits.
//!
//! ## Architecture
//!
//! - **Channels**: fixed six-slot reading snapshot (`channel` module)
//! - **Statistics**: total, mean baseline, standard deviation in volts (`stats`)
//! - **Resolver**: active-set classification and verdict reduction (`resolver`)
//! - **Debounce**: blocking press confirmation on an injected clock (`debounce`)
//! - **Mode**: display mode and tolerance state machine, view selection (`mode`)
//! - **Session**: per-loop context that runs one tick (`session`, `builder`)
//! - **Runner**: live loop with shutdown flag, and CSV replay (`runner`)
//!
//! ## Tick order
//!
//! Buttons are scanned first (mode, then tolerance up, then tolerance down;
//! at most one press per tick). Then the six channels are sampled once,
//! statistics and the verdict are computed from that immutable snapshot,
//! the diagnostic gate is consulted, and the current mode's view is rendered.

// Module declarations
pub mod builder;
pub mod channel;
pub mod config;
pub mod conversions;
pub mod debounce;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod hw_error;
pub mod mocks;
pub mod mode;
pub mod render;
pub mod resolver;
pub mod runner;
pub mod session;
pub mod stats;

pub use builder::{GearSession, GearSessionBuilder, GearSessionG, Missing, Set, build_session};
pub use channel::{ADC_MAX, Channel, Readings};
pub use config::{DebounceCfg, DiagnosticsCfg, DisplayCfg, ResolverCfg};
pub use debounce::{DebounceMachine, DebounceState, Debouncer};
pub use diagnostics::{DiagnosticGate, DiagnosticReport, DiagnosticSink, TracingSink};
pub use error::{BuildError, GearError, Report, Result};
pub use mode::{
    DEFAULT_TOLERANCE, DisplayMode, ModeController, TOLERANCE_MAX, TOLERANCE_MIN,
    TOLERANCE_STEP, Tolerance, Transition,
};
pub use render::{Renderer, View};
pub use resolver::{GearVerdict, Resolution, active_channels, count_active, is_active, resolve};
pub use runner::{RunParams, RunSummary, replay, run};
pub use session::{SessionCore, Snapshot, TickOutcome};
pub use stats::{BaselineMethod, TickStats, mean, standard_deviation, to_voltage, total};
