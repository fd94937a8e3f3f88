//! Render boundary.
//!
//! The engine never draws. Each tick it hands the selected `View` to a
//! `Renderer`, which owns layout, glyphs and the physical surface.

use crate::channel::Readings;
use crate::mode::Tolerance;
use crate::resolver::GearVerdict;

/// One of the nine screen layouts, carrying exactly the inputs it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Large gear symbol and gear name.
    Basic { verdict: GearVerdict },
    /// Gear plus active-channel voltage and its deviation, or the baseline
    /// voltage when no single gear is engaged.
    Advanced {
        verdict: GearVerdict,
        active_v: Option<f32>,
        differential_v: Option<f32>,
        baseline_v: f32,
    },
    /// Standard deviation, tolerance and baseline.
    Variables {
        verdict: GearVerdict,
        std_dev_v: f32,
        tolerance: Tolerance,
        tolerance_in_volts: bool,
        baseline_v: f32,
        debug: bool,
    },
    /// All six raw counts.
    RawValues { readings: Readings },
    /// All six readings as volts.
    RawVoltages { readings: Readings },
    /// Whole surface filled with the gear symbol.
    Fill { symbol: char },
    Credits,
    /// Leave the surface untouched.
    Blank,
}

pub trait Renderer {
    /// Wipe the surface (called after a mode change).
    fn clear(&mut self);
    fn render(&mut self, view: &View);
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn clear(&mut self) {
        (**self).clear();
    }
    fn render(&mut self, view: &View) {
        (**self).render(view);
    }
}
