//! Test and helper mocks for gear_core

use std::collections::{HashMap, VecDeque};

use gear_traits::{Button, ButtonPins, CHANNEL_COUNT, HallSensors, Level};

use crate::diagnostics::{DiagnosticReport, DiagnosticSink};
use crate::render::{Renderer, View};

/// Sensors that return queued frames in order, then repeat the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensors {
    frames: VecDeque<[u16; CHANNEL_COUNT]>,
    last: [u16; CHANNEL_COUNT],
}

impl ScriptedSensors {
    pub fn new(frames: impl IntoIterator<Item = [u16; CHANNEL_COUNT]>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            last: [0; CHANNEL_COUNT],
        }
    }

    /// Every sample returns `frame`.
    pub fn constant(frame: [u16; CHANNEL_COUNT]) -> Self {
        Self {
            frames: VecDeque::new(),
            last: frame,
        }
    }
}

impl HallSensors for ScriptedSensors {
    fn sample(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>> {
        if let Some(f) = self.frames.pop_front() {
            self.last = f;
        }
        Ok(self.last)
    }
}

/// Sensors whose every read fails with an I/O error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSensors;

impl HallSensors for FailingSensors {
    fn sample(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("adc offline")))
    }
}

/// Buttons driven by per-button level scripts. Once a script runs out the
/// pin reads `High` (released).
#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    scripts: HashMap<Button, VecDeque<Level>>,
    reads: usize,
}

impl ScriptedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue explicit levels for `button`.
    pub fn script(mut self, button: Button, levels: impl IntoIterator<Item = Level>) -> Self {
        self.scripts.entry(button).or_default().extend(levels);
        self
    }

    /// Queue a clean press: `polls` consecutive low reads.
    pub fn press(self, button: Button, polls: usize) -> Self {
        self.script(button, std::iter::repeat_n(Level::Low, polls))
    }

    /// Total `level` calls served.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ButtonPins for ScriptedButtons {
    fn level(&mut self, button: Button) -> Level {
        self.reads += 1;
        self.scripts
            .get_mut(&button)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Level::High)
    }
}

/// Renderer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}
    fn render(&mut self, _view: &View) {}
}

/// Renderer that keeps every view it was handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub views: Vec<View>,
    pub clears: usize,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.clears += 1;
    }
    fn render(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}

/// Sink that keeps every report.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub reports: Vec<DiagnosticReport>,
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, report: &DiagnosticReport) {
        self.reports.push(report.clone());
    }
}

