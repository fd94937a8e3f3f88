//! The per-loop context: owns the hardware handles and all mutable state,
//! and runs one control-loop tick at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::WrapErr;
use gear_traits::{Button, ButtonPins, Clock, HallSensors};

use crate::channel::Readings;
use crate::config::DisplayCfg;
use crate::debounce::Debouncer;
use crate::diagnostics::{DiagnosticGate, DiagnosticReport};
use crate::error::Result;
use crate::hw_error::map_hw_error_dyn;
use crate::mode::{DisplayMode, ModeController, Tolerance, Transition};
use crate::render::{Renderer, View};
use crate::resolver::{GearVerdict, Resolution};
use crate::stats::{BaselineMethod, TickStats};

/// Everything derived from one set of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub readings: Readings,
    pub stats: TickStats,
    pub resolution: Resolution,
    /// Tolerance the resolution was computed with.
    pub tolerance: Tolerance,
}

impl Snapshot {
    pub fn compute(readings: Readings, method: BaselineMethod, tolerance: Tolerance) -> Self {
        let stats = TickStats::compute(&readings, method);
        let resolution = Resolution::compute(&readings, stats.baseline, tolerance.get());
        Self {
            readings,
            stats,
            resolution,
            tolerance,
        }
    }
}

/// Result of a single tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub snapshot: Snapshot,
    /// Button effect applied at the head of this tick.
    pub transition: Transition,
    /// False when rendering (and the dump) was suppressed for a
    /// `Fault`/`Error` verdict.
    pub rendered: bool,
    /// Present when the diagnostic gate admitted a dump this tick.
    pub diagnostic: Option<DiagnosticReport>,
}

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct SessionCore<S: HallSensors, B: ButtonPins> {
    pub(crate) sensors: S,
    pub(crate) buttons: B,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) debouncer: Debouncer,
    pub(crate) controller: ModeController,
    pub(crate) baseline: BaselineMethod,
    pub(crate) display: DisplayCfg,
    pub(crate) diagnostics: Option<DiagnosticGate>,
    pub(crate) last: Option<Snapshot>,
    pub(crate) ticks: u64,
}

impl<S: HallSensors, B: ButtonPins> core::fmt::Debug for SessionCore<S, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionCore")
            .field("mode", &self.controller.mode())
            .field("tolerance", &self.controller.tolerance().get())
            .field("verdict", &self.verdict())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<S: HallSensors, B: ButtonPins> SessionCore<S, B> {
    /// Verdict of the most recent tick, `Fault` before the first one.
    pub fn verdict(&self) -> GearVerdict {
        self.last
            .map_or(GearVerdict::Fault, |s| s.resolution.verdict)
    }

    pub fn mode(&self) -> DisplayMode {
        self.controller.mode()
    }

    pub fn tolerance(&self) -> Tolerance {
        self.controller.tolerance()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// Completed ticks since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Milliseconds since the session was built, on the session clock.
    pub fn uptime_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    pub(crate) fn clock(&self) -> &(dyn Clock + Send + Sync) {
        &*self.clock
    }

    /// Show the credits screen for `splash_ms`, then clear the surface.
    pub fn splash<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if self.display.splash_ms == 0 {
            return;
        }
        renderer.render(&View::Credits);
        self.clock
            .sleep(Duration::from_millis(self.display.splash_ms));
        renderer.clear();
    }

    /// Scan buttons in priority order; the first confirmed press is applied
    /// and ends the scan.
    pub fn poll_buttons(&mut self) -> Transition {
        for button in Button::SCAN_ORDER {
            if self
                .debouncer
                .check_press(&mut self.buttons, button, &*self.clock)
            {
                return self.controller.on_press(button);
            }
        }
        Transition::None
    }

    /// One iteration of the control loop: buttons, sample, resolve,
    /// diagnostics, render.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<TickOutcome> {
        let transition = self.head_of_tick(renderer);
        let raw = self
            .sensors
            .sample()
            .map_err(|e| eyre::Report::new(map_hw_error_dyn(&*e)))
            .wrap_err("sampling hall sensors")?;
        Ok(self.process(Readings::new(raw), transition, renderer))
    }

    /// Same as `tick`, but with externally supplied readings (replay, tests).
    pub fn tick_with_readings<R: Renderer + ?Sized>(
        &mut self,
        readings: Readings,
        renderer: &mut R,
    ) -> TickOutcome {
        let transition = self.head_of_tick(renderer);
        self.process(readings, transition, renderer)
    }

    fn head_of_tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Transition {
        let transition = self.poll_buttons();
        if matches!(transition, Transition::ModeChanged { .. }) {
            self.clock
                .sleep(Duration::from_millis(self.display.mode_settle_ms));
            renderer.clear();
        }
        transition
    }

    fn process<R: Renderer + ?Sized>(
        &mut self,
        readings: Readings,
        transition: Transition,
        renderer: &mut R,
    ) -> TickOutcome {
        let tolerance = self.controller.tolerance();
        let snapshot = Snapshot::compute(readings, self.baseline, tolerance);
        let verdict = snapshot.resolution.verdict;

        let previous = self.verdict();
        if previous != verdict {
            tracing::debug!(
                from = %previous,
                to = %verdict,
                active = snapshot.resolution.active_count,
                baseline = snapshot.stats.baseline,
                "verdict changed"
            );
        }
        self.last = Some(snapshot);
        self.ticks = self.ticks.saturating_add(1);

        // Without debug, failures leave the previous frame on screen and skip
        // the dump.
        if !self.display.debug && verdict.is_failure() {
            tracing::trace!(%verdict, "render suppressed");
            return TickOutcome {
                snapshot,
                transition,
                rendered: false,
                diagnostic: None,
            };
        }

        let now = self.clock.now();
        let due = self.diagnostics.as_mut().is_some_and(|g| g.ready(now));
        let diagnostic = due.then(|| {
            DiagnosticReport::new(self.ticks, self.controller.mode(), tolerance, &snapshot)
        });

        renderer.render(&self.controller.view(&snapshot, self.display.debug));

        TickOutcome {
            snapshot,
            transition,
            rendered: true,
            diagnostic,
        }
    }
}
