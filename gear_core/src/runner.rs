//! Loop drivers around `SessionCore::tick`.
//!
//! `run` drives a live session until the shutdown flag is raised or a tick
//! budget is spent; `replay` feeds recorded readings through the same path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gear_traits::{ButtonPins, HallSensors};

use crate::channel::Readings;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::mode::{DisplayMode, Tolerance};
use crate::render::Renderer;
use crate::resolver::GearVerdict;
use crate::session::{SessionCore, TickOutcome};

/// Loop pacing and termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunParams {
    /// Minimum spacing between tick starts (ms); 0 runs free.
    pub loop_period_ms: u64,
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

/// What a run or replay did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub last_verdict: GearVerdict,
    /// Ticks whose verdict differed from the previous tick's.
    pub verdict_changes: u64,
    pub diagnostics_emitted: u64,
    pub mode: DisplayMode,
    pub tolerance: Tolerance,
    /// Session clock time since the session was built.
    pub uptime_ms: u64,
}

impl RunSummary {
    fn record<D: DiagnosticSink + ?Sized>(&mut self, outcome: &TickOutcome, sink: &mut D) {
        let verdict = outcome.snapshot.resolution.verdict;
        if self.ticks > 0 && verdict != self.last_verdict {
            self.verdict_changes += 1;
        }
        self.ticks += 1;
        self.last_verdict = verdict;
        if let Some(report) = &outcome.diagnostic {
            sink.emit(report);
            self.diagnostics_emitted += 1;
        }
    }

    fn finish<S: HallSensors, B: ButtonPins>(mut self, session: &SessionCore<S, B>) -> Self {
        self.mode = session.mode();
        self.tolerance = session.tolerance();
        self.uptime_ms = session.uptime_ms();
        self
    }
}

/// Drive `session` until `shutdown` is set or `params.max_ticks` is reached.
///
/// The flag is checked between ticks only; a debounce sequence in progress
/// always completes. Sensor failures end the run with the mapped error.
pub fn run<S, B, R, D>(
    session: &mut SessionCore<S, B>,
    renderer: &mut R,
    sink: &mut D,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> Result<RunSummary>
where
    S: HallSensors,
    B: ButtonPins,
    R: Renderer + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    let period = Duration::from_millis(params.loop_period_ms);
    let mut summary = RunSummary::default();
    tracing::info!(
        loop_period_ms = params.loop_period_ms,
        max_ticks = ?params.max_ticks,
        mode = %session.mode(),
        tolerance = session.tolerance().get(),
        "gear loop start"
    );

    if !shutdown.load(Ordering::Relaxed) {
        session.splash(renderer);
    }

    while !shutdown.load(Ordering::Relaxed) {
        if params.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }
        let started = session.clock().now();
        let outcome = match session.tick(renderer) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, ticks = summary.ticks, "gear loop aborted");
                return Err(e);
            }
        };
        summary.record(&outcome, sink);

        if !period.is_zero() {
            let spent = Duration::from_millis(session.clock().ms_since(started));
            if let Some(rest) = period.checked_sub(spent) {
                session.clock().sleep(rest);
            }
        }
    }

    let summary = summary.finish(session);
    tracing::info!(
        ticks = summary.ticks,
        verdict = %summary.last_verdict,
        changes = summary.verdict_changes,
        uptime_ms = summary.uptime_ms,
        "gear loop stop"
    );
    Ok(summary)
}

/// Feed recorded readings through the session, one tick per frame.
pub fn replay<S, B, R, D, I>(
    session: &mut SessionCore<S, B>,
    frames: I,
    renderer: &mut R,
    sink: &mut D,
) -> RunSummary
where
    S: HallSensors,
    B: ButtonPins,
    R: Renderer + ?Sized,
    D: DiagnosticSink + ?Sized,
    I: IntoIterator,
    I::Item: Into<Readings>,
{
    let mut summary = RunSummary::default();
    for frame in frames {
        let outcome = session.tick_with_readings(frame.into(), renderer);
        summary.record(&outcome, sink);
    }
    let summary = summary.finish(session);
    tracing::debug!(
        ticks = summary.ticks,
        verdict = %summary.last_verdict,
        "replay complete"
    );
    summary
}
