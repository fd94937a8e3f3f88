//! Type-state builder for `GearSession` and generic `build_session` constructor.
//!
//! The builder enforces at compile time that sensors and buttons are provided
//! before `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use gear_traits::clock::{Clock, MonotonicClock};
use gear_traits::{ButtonPins, HallSensors};

use crate::config::{DebounceCfg, DiagnosticsCfg, DisplayCfg, ResolverCfg};
use crate::debounce::Debouncer;
use crate::diagnostics::DiagnosticGate;
use crate::error::{BuildError, Result};
use crate::mode::{ModeController, TOLERANCE_STEP, Tolerance};
use crate::session::SessionCore;

/// Public dynamic (boxed) session.
pub type GearSession = SessionCore<Box<dyn HallSensors>, Box<dyn ButtonPins>>;

impl GearSession {
    /// Start building a session.
    pub fn builder() -> GearSessionBuilder<Missing, Missing> {
        GearSessionBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `GearSession`. All fields are validated on `build()`.
pub struct GearSessionBuilder<S, B> {
    sensors: Option<Box<dyn HallSensors>>,
    buttons: Option<Box<dyn ButtonPins>>,
    resolver: Option<ResolverCfg>,
    debounce: Option<DebounceCfg>,
    diagnostics: Option<DiagnosticsCfg>,
    display: Option<DisplayCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
    _b: PhantomData<B>,
}

impl Default for GearSessionBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            sensors: None,
            buttons: None,
            resolver: None,
            debounce: None,
            diagnostics: None,
            display: None,
            clock: None,
            _s: PhantomData,
            _b: PhantomData,
        }
    }
}

/// Validate configuration and construct a `SessionCore`.
///
/// This is the single source of truth for validation and construction,
/// used by both `GearSessionBuilder::try_build()` and `build_session()`.
fn validate_and_build<S: HallSensors, B: ButtonPins>(
    sensors: S,
    buttons: B,
    resolver: ResolverCfg,
    debounce: DebounceCfg,
    diagnostics: DiagnosticsCfg,
    display: DisplayCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<SessionCore<S, B>> {
    // ── Validation ───────────────────────────────────────────────────────────
    let tolerance = Tolerance::new(resolver.tolerance).ok_or_else(|| {
        eyre::Report::new(BuildError::InvalidConfig("tolerance must be in [0, 995]"))
    })?;
    if resolver.tolerance % TOLERANCE_STEP != 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tolerance must be a multiple of 5",
        )));
    }
    if debounce.count == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "debounce count must be >= 1",
        )));
    }
    if debounce.interval_ms > 1000 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "debounce interval must be <= 1000 ms",
        )));
    }
    if diagnostics.enabled && diagnostics.interval_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "diagnostics interval must be >= 1 ms",
        )));
    }

    // ── Assemble ─────────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();
    let gate = diagnostics
        .enabled
        .then(|| DiagnosticGate::new(Duration::from_millis(diagnostics.interval_ms)));

    let initial_mode = display.initial_mode;
    tracing::debug!(
        tolerance = tolerance.get(),
        baseline = ?resolver.baseline,
        debounce_ms = debounce.interval_ms,
        debounce_count = debounce.count,
        mode = %initial_mode,
        "gear session built"
    );

    Ok(SessionCore {
        sensors,
        buttons,
        clock,
        epoch,
        debouncer: Debouncer::new(&debounce),
        controller: ModeController::new(initial_mode, tolerance),
        baseline: resolver.baseline,
        display,
        diagnostics: gate,
        last: None,
        ticks: 0,
    })
}

impl<S, B> GearSessionBuilder<S, B> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<GearSession> {
        let sensors = self
            .sensors
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensors))?;
        let buttons = self
            .buttons
            .ok_or_else(|| eyre::Report::new(BuildError::MissingButtons))?;

        validate_and_build(
            sensors,
            buttons,
            self.resolver.unwrap_or_default(),
            self.debounce.unwrap_or_default(),
            self.diagnostics.unwrap_or_default(),
            self.display.unwrap_or_default(),
            self.clock,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<S, B> GearSessionBuilder<S, B> {
    pub fn with_resolver(mut self, resolver: ResolverCfg) -> Self {
        self.resolver = Some(resolver);
        self
    }
    pub fn with_tolerance(mut self, tolerance: u16) -> Self {
        let mut r = self.resolver.unwrap_or_default();
        r.tolerance = tolerance;
        self.resolver = Some(r);
        self
    }
    pub fn with_debounce(mut self, debounce: DebounceCfg) -> Self {
        self.debounce = Some(debounce);
        self
    }
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsCfg) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
    pub fn with_display(mut self, display: DisplayCfg) -> Self {
        self.display = Some(display);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<B> GearSessionBuilder<Missing, B> {
    pub fn with_sensors(self, sensors: impl HallSensors + 'static) -> GearSessionBuilder<Set, B> {
        GearSessionBuilder {
            sensors: Some(Box::new(sensors)),
            buttons: self.buttons,
            resolver: self.resolver,
            debounce: self.debounce,
            diagnostics: self.diagnostics,
            display: self.display,
            clock: self.clock,
            _s: PhantomData,
            _b: PhantomData,
        }
    }
}

impl<S> GearSessionBuilder<S, Missing> {
    pub fn with_buttons(self, buttons: impl ButtonPins + 'static) -> GearSessionBuilder<S, Set> {
        GearSessionBuilder {
            sensors: self.sensors,
            buttons: Some(Box::new(buttons)),
            resolver: self.resolver,
            debounce: self.debounce,
            diagnostics: self.diagnostics,
            display: self.display,
            clock: self.clock,
            _s: PhantomData,
            _b: PhantomData,
        }
    }
}

impl GearSessionBuilder<Set, Set> {
    /// Validate and build the session. Only available when sensors and buttons are set.
    pub fn build(self) -> Result<GearSession> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type GearSessionG<S, B> = SessionCore<S, B>;

/// Build a generic, statically-dispatched `GearSessionG` from concrete sensors and buttons.
///
/// Delegates to the shared `validate_and_build`, so validation is identical to the builder.
pub fn build_session<S, B>(
    sensors: S,
    buttons: B,
    resolver: ResolverCfg,
    debounce: DebounceCfg,
    diagnostics: DiagnosticsCfg,
    display: DisplayCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<GearSessionG<S, B>>
where
    S: HallSensors,
    B: ButtonPins,
{
    validate_and_build(
        sensors,
        buttons,
        resolver,
        debounce,
        diagnostics,
        display,
        clock,
    )
}
