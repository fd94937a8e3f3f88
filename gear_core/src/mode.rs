//! Display mode and tolerance state machine.
//!
//! `ModeController` is the single owner of the user-adjustable state. It is
//! mutated only by confirmed button presses and turns each tick's snapshot
//! into the `View` the renderer should draw.

use core::fmt;

use gear_traits::Button;
use serde::Serialize;

use crate::render::View;
use crate::session::Snapshot;
use crate::stats::to_voltage;

pub const TOLERANCE_MIN: u16 = 0;
pub const TOLERANCE_MAX: u16 = 995;
pub const TOLERANCE_STEP: u16 = 5;
pub const DEFAULT_TOLERANCE: u16 = 200;

/// Screen layout selected by the mode button. Cycles in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DisplayMode {
    #[default]
    Basic,
    Advanced,
    /// Statistics page with the tolerance shown in volts.
    VariablesVolts,
    /// Statistics page with the tolerance shown in raw counts.
    VariablesRaw,
    RawValues,
    RawVoltages,
    Fill,
    Credits,
    Blank,
}

impl DisplayMode {
    pub const COUNT: usize = 9;

    pub const ALL: [DisplayMode; Self::COUNT] = [
        DisplayMode::Basic,
        DisplayMode::Advanced,
        DisplayMode::VariablesVolts,
        DisplayMode::VariablesRaw,
        DisplayMode::RawValues,
        DisplayMode::RawVoltages,
        DisplayMode::Fill,
        DisplayMode::Credits,
        DisplayMode::Blank,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next mode, wrapping from the last back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub const fn name(self) -> &'static str {
        match self {
            DisplayMode::Basic => "basic",
            DisplayMode::Advanced => "advanced",
            DisplayMode::VariablesVolts => "variables-volts",
            DisplayMode::VariablesRaw => "variables-raw",
            DisplayMode::RawValues => "raw-values",
            DisplayMode::RawVoltages => "raw-voltages",
            DisplayMode::Fill => "fill",
            DisplayMode::Credits => "credits",
            DisplayMode::Blank => "blank",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Activity threshold in raw counts, always within
/// [`TOLERANCE_MIN`, `TOLERANCE_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tolerance(u16);

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_TOLERANCE)
    }
}

impl Tolerance {
    /// Returns `None` when `raw` is outside the allowed range.
    pub fn new(raw: u16) -> Option<Self> {
        (TOLERANCE_MIN..=TOLERANCE_MAX)
            .contains(&raw)
            .then_some(Self(raw))
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    pub fn volts(self) -> f32 {
        to_voltage(i32::from(self.0))
    }

    /// One step up, or `None` if that would leave the range.
    pub fn increased(self) -> Option<Self> {
        self.0.checked_add(TOLERANCE_STEP).and_then(Self::new)
    }

    /// One step down, or `None` if that would leave the range.
    pub fn decreased(self) -> Option<Self> {
        self.0.checked_sub(TOLERANCE_STEP).and_then(Self::new)
    }
}

/// Effect of a confirmed button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ModeChanged { from: DisplayMode, to: DisplayMode },
    ToleranceChanged { from: Tolerance, to: Tolerance },
    /// Press confirmed but clamped at a tolerance bound.
    Clamped(Button),
    /// No press this tick.
    None,
}

#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: DisplayMode,
    tolerance: Tolerance,
}

impl ModeController {
    pub fn new(mode: DisplayMode, tolerance: Tolerance) -> Self {
        Self { mode, tolerance }
    }

    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Apply a confirmed press.
    pub fn on_press(&mut self, button: Button) -> Transition {
        match button {
            Button::Mode => {
                let from = self.mode;
                self.mode = from.next();
                tracing::info!(from = %from, to = %self.mode, "display mode changed");
                Transition::ModeChanged { from, to: self.mode }
            }
            Button::ToleranceUp | Button::ToleranceDown => {
                let from = self.tolerance;
                let next = if button == Button::ToleranceUp {
                    from.increased()
                } else {
                    from.decreased()
                };
                match next {
                    Some(to) => {
                        self.tolerance = to;
                        tracing::info!(from = from.get(), to = to.get(), "tolerance changed");
                        Transition::ToleranceChanged { from, to }
                    }
                    None => {
                        tracing::debug!(?button, tolerance = from.get(), "tolerance at bound");
                        Transition::Clamped(button)
                    }
                }
            }
        }
    }

    /// Select the render variant for the current mode and fill in its inputs.
    pub fn view(&self, snapshot: &Snapshot, debug: bool) -> View {
        let verdict = snapshot.resolution.verdict;
        let baseline_v = to_voltage(snapshot.stats.baseline);
        match self.mode {
            DisplayMode::Basic => View::Basic { verdict },
            DisplayMode::Advanced => {
                let (active_v, differential_v) = match (
                    snapshot.resolution.active_value,
                    snapshot.resolution.differential,
                ) {
                    (Some(v), Some(d)) => (
                        Some(to_voltage(i32::from(v))),
                        Some(to_voltage(i32::try_from(d).unwrap_or(i32::MAX))),
                    ),
                    _ => (None, None),
                };
                View::Advanced {
                    verdict,
                    active_v,
                    differential_v,
                    baseline_v,
                }
            }
            DisplayMode::VariablesVolts | DisplayMode::VariablesRaw => View::Variables {
                verdict,
                std_dev_v: snapshot.stats.std_dev_v,
                tolerance: self.tolerance,
                tolerance_in_volts: self.mode == DisplayMode::VariablesVolts,
                baseline_v,
                debug,
            },
            DisplayMode::RawValues => View::RawValues {
                readings: snapshot.readings,
            },
            DisplayMode::RawVoltages => View::RawVoltages {
                readings: snapshot.readings,
            },
            DisplayMode::Fill => View::Fill {
                symbol: verdict.symbol(),
            },
            DisplayMode::Credits => View::Credits,
            DisplayMode::Blank => View::Blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cycle_visits_every_mode_once() {
        let mut m = DisplayMode::Basic;
        let mut seen = Vec::new();
        for _ in 0..DisplayMode::COUNT {
            seen.push(m.index());
            m = m.next();
        }
        assert_eq!(seen, (0..DisplayMode::COUNT).collect::<Vec<_>>());
        assert_eq!(m, DisplayMode::Basic);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, m) in DisplayMode::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
            assert_eq!(DisplayMode::from_index(i), Some(*m));
        }
        assert_eq!(DisplayMode::Blank.next(), DisplayMode::Basic);
    }

    #[test]
    fn tolerance_bounds_are_no_ops() {
        let top = Tolerance::new(TOLERANCE_MAX).unwrap();
        assert_eq!(top.increased(), None);
        let bottom = Tolerance::new(TOLERANCE_MIN).unwrap();
        assert_eq!(bottom.decreased(), None);
        assert_eq!(Tolerance::new(996), None);
    }

    #[test]
    fn off_grid_tolerance_never_exceeds_max() {
        let t = Tolerance::new(993).unwrap();
        assert_eq!(t.increased(), None);
        assert_eq!(t.decreased().map(Tolerance::get), Some(988));
    }

    #[test]
    fn controller_clamps_and_reports() {
        let mut c = ModeController::new(DisplayMode::Basic, Tolerance::new(995).unwrap());
        assert_eq!(
            c.on_press(Button::ToleranceUp),
            Transition::Clamped(Button::ToleranceUp)
        );
        assert_eq!(c.tolerance().get(), 995);
        assert!(matches!(
            c.on_press(Button::ToleranceDown),
            Transition::ToleranceChanged { .. }
        ));
        assert_eq!(c.tolerance().get(), 990);
    }
}
