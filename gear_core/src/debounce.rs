//! Blocking button debounce.
//!
//! A press is confirmed only if the pin stays at the active level for
//! `count` consecutive polls spaced `interval` apart. The transitions live in
//! `DebounceMachine` so they can be driven without time; `Debouncer` runs the
//! machine to completion and waits between polls through a `Clock`.

use std::time::Duration;

use gear_traits::{Button, ButtonPins, Clock, Level};

use crate::config::DebounceCfg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// Waiting for `remaining` more active polls.
    Sampling { remaining: u8 },
    Confirmed,
    Rejected,
}

/// Pure debounce transitions for one pin.
#[derive(Debug, Clone)]
pub struct DebounceMachine {
    state: DebounceState,
    active_level: Level,
    count: u8,
}

impl DebounceMachine {
    pub fn new(active_level: Level, count: u8) -> Self {
        Self {
            state: DebounceState::Idle,
            active_level,
            count,
        }
    }

    #[inline]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Feed the initial level. Leaves `Idle` only when the pin is active.
    pub fn begin(&mut self, level: Level) -> DebounceState {
        if self.state == DebounceState::Idle && level == self.active_level {
            self.state = if self.count == 0 {
                DebounceState::Confirmed
            } else {
                DebounceState::Sampling {
                    remaining: self.count,
                }
            };
        }
        self.state
    }

    /// Feed one confirmation poll. No effect outside `Sampling`.
    pub fn poll(&mut self, level: Level) -> DebounceState {
        if let DebounceState::Sampling { remaining } = self.state {
            self.state = if level != self.active_level {
                DebounceState::Rejected
            } else if remaining <= 1 {
                DebounceState::Confirmed
            } else {
                DebounceState::Sampling {
                    remaining: remaining - 1,
                }
            };
        }
        self.state
    }

    /// Return to `Idle`, reporting whether the sequence confirmed a press.
    pub fn finish(&mut self) -> bool {
        let confirmed = self.state == DebounceState::Confirmed;
        self.state = DebounceState::Idle;
        confirmed
    }
}

/// Runs a debounce sequence against real pins.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    count: u8,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(&DebounceCfg::default())
    }
}

impl Debouncer {
    pub fn new(cfg: &DebounceCfg) -> Self {
        Self {
            interval: Duration::from_millis(cfg.interval_ms),
            count: cfg.count,
        }
    }

    /// Longest time a single `check_press` can block.
    pub fn window(&self) -> Duration {
        self.interval.saturating_mul(u32::from(self.count))
    }

    /// Returns true if `button` is pressed and stays pressed for the whole
    /// debounce window. Blocks on `clock` while sampling.
    pub fn check_press<P, C>(&self, pins: &mut P, button: Button, clock: &C) -> bool
    where
        P: ButtonPins + ?Sized,
        C: Clock + ?Sized,
    {
        let mut machine = DebounceMachine::new(Level::Low, self.count);
        if machine.begin(pins.level(button)) == DebounceState::Idle {
            return false;
        }
        while let DebounceState::Sampling { remaining } = machine.state() {
            clock.sleep(self.interval);
            let level = pins.level(button);
            tracing::trace!(?button, ?level, remaining, "debounce poll");
            machine.poll(level);
        }
        let confirmed = machine.finish();
        tracing::debug!(?button, confirmed, "debounce complete");
        confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_on_inactive_level() {
        let mut m = DebounceMachine::new(Level::Low, 6);
        assert_eq!(m.begin(Level::High), DebounceState::Idle);
        assert!(!m.finish());
    }

    #[test]
    fn six_active_polls_confirm() {
        let mut m = DebounceMachine::new(Level::Low, 6);
        assert_eq!(m.begin(Level::Low), DebounceState::Sampling { remaining: 6 });
        for _ in 0..5 {
            assert!(matches!(m.poll(Level::Low), DebounceState::Sampling { .. }));
        }
        assert_eq!(m.poll(Level::Low), DebounceState::Confirmed);
        assert!(m.finish());
        assert_eq!(m.state(), DebounceState::Idle);
    }

    #[test]
    fn bounce_rejects_and_later_polls_are_ignored() {
        let mut m = DebounceMachine::new(Level::Low, 6);
        m.begin(Level::Low);
        m.poll(Level::Low);
        assert_eq!(m.poll(Level::High), DebounceState::Rejected);
        assert_eq!(m.poll(Level::Low), DebounceState::Rejected);
        assert!(!m.finish());
    }

    #[test]
    fn zero_count_confirms_on_first_read() {
        let mut m = DebounceMachine::new(Level::Low, 0);
        assert_eq!(m.begin(Level::Low), DebounceState::Confirmed);
    }

    #[test]
    fn window_is_interval_times_count() {
        let d = Debouncer::default();
        assert_eq!(d.window(), Duration::from_millis(120));
    }
}
