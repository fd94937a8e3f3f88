//! Gear resolution: classify channels against a baseline and reduce the
//! active set to a single verdict.
//!
//! Policy is strict mutual exclusion: exactly one active channel names the
//! gear, none means neutral, and two or more is reported as `Error` rather
//! than broken by priority.

use core::fmt;

use serde::Serialize;

use crate::channel::{Channel, Readings};

/// Resolved gear for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GearVerdict {
    /// Nothing resolved yet (before the first complete tick).
    #[default]
    Fault,
    /// More than one channel active at once.
    Error,
    Neutral,
    Gear1,
    Gear2,
    Gear3,
    Gear4,
    Gear5,
    Reverse,
}

impl GearVerdict {
    pub const ALL: [GearVerdict; 9] = [
        GearVerdict::Fault,
        GearVerdict::Error,
        GearVerdict::Neutral,
        GearVerdict::Gear1,
        GearVerdict::Gear2,
        GearVerdict::Gear3,
        GearVerdict::Gear4,
        GearVerdict::Gear5,
        GearVerdict::Reverse,
    ];

    /// Numeric code: -2 fault, -1 error, 0 neutral, 1..=5 gears, 6 reverse.
    pub const fn code(self) -> i8 {
        match self {
            GearVerdict::Fault => -2,
            GearVerdict::Error => -1,
            GearVerdict::Neutral => 0,
            GearVerdict::Gear1 => 1,
            GearVerdict::Gear2 => 2,
            GearVerdict::Gear3 => 3,
            GearVerdict::Gear4 => 4,
            GearVerdict::Gear5 => 5,
            GearVerdict::Reverse => 6,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }

    pub const fn from_channel(channel: Channel) -> Self {
        match channel {
            Channel::Gear1 => GearVerdict::Gear1,
            Channel::Gear2 => GearVerdict::Gear2,
            Channel::Gear3 => GearVerdict::Gear3,
            Channel::Gear4 => GearVerdict::Gear4,
            Channel::Gear5 => GearVerdict::Gear5,
            Channel::Reverse => GearVerdict::Reverse,
        }
    }

    pub const fn channel(self) -> Option<Channel> {
        match self {
            GearVerdict::Gear1 => Some(Channel::Gear1),
            GearVerdict::Gear2 => Some(Channel::Gear2),
            GearVerdict::Gear3 => Some(Channel::Gear3),
            GearVerdict::Gear4 => Some(Channel::Gear4),
            GearVerdict::Gear5 => Some(Channel::Gear5),
            GearVerdict::Reverse => Some(Channel::Reverse),
            GearVerdict::Fault | GearVerdict::Error | GearVerdict::Neutral => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            GearVerdict::Fault => "Fault",
            GearVerdict::Error => "Error",
            GearVerdict::Neutral => "Neutral",
            GearVerdict::Gear1 => "First",
            GearVerdict::Gear2 => "Second",
            GearVerdict::Gear3 => "Third",
            GearVerdict::Gear4 => "Fourth",
            GearVerdict::Gear5 => "Fifth",
            GearVerdict::Reverse => "Reverse",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            GearVerdict::Fault => 'F',
            GearVerdict::Error => 'E',
            GearVerdict::Neutral => 'N',
            GearVerdict::Gear1 => '1',
            GearVerdict::Gear2 => '2',
            GearVerdict::Gear3 => '3',
            GearVerdict::Gear4 => '4',
            GearVerdict::Gear5 => '5',
            GearVerdict::Reverse => 'R',
        }
    }

    /// True when a single gear (forward or reverse) is engaged.
    #[inline]
    pub const fn in_gear(self) -> bool {
        self.code() > 0
    }

    /// True for `Fault` and `Error`.
    #[inline]
    pub const fn is_failure(self) -> bool {
        self.code() < 0
    }
}

impl fmt::Display for GearVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A channel is active when it deviates from the baseline by strictly more
/// than the tolerance.
#[inline]
pub fn is_active(value: u16, baseline: i32, tolerance: u16) -> bool {
    i32::from(value).abs_diff(baseline) > u32::from(tolerance)
}

/// Channels currently active, in priority order.
pub fn active_channels(
    readings: &Readings,
    baseline: i32,
    tolerance: u16,
) -> impl Iterator<Item = Channel> + '_ {
    readings
        .iter()
        .filter(move |&(_, v)| is_active(v, baseline, tolerance))
        .map(|(ch, _)| ch)
}

pub fn count_active(readings: &Readings, baseline: i32, tolerance: u16) -> usize {
    active_channels(readings, baseline, tolerance).count()
}

/// Reduce six readings to a verdict. Never returns `Fault`; that value is
/// reserved for "not resolved yet".
pub fn resolve(readings: &Readings, baseline: i32, tolerance: u16) -> GearVerdict {
    Resolution::compute(readings, baseline, tolerance).verdict
}

/// A verdict together with the details of the engaged channel, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    pub verdict: GearVerdict,
    pub active_count: usize,
    /// Present only when exactly one channel is active.
    pub active: Option<Channel>,
    pub active_value: Option<u16>,
    /// |active_value - baseline| in raw counts.
    pub differential: Option<u32>,
}

impl Resolution {
    /// Placeholder before the first tick has been resolved.
    pub const fn unresolved() -> Self {
        Self {
            verdict: GearVerdict::Fault,
            active_count: 0,
            active: None,
            active_value: None,
            differential: None,
        }
    }

    pub fn compute(readings: &Readings, baseline: i32, tolerance: u16) -> Self {
        let mut first: Option<(Channel, u16)> = None;
        let mut count = 0usize;
        for (ch, v) in readings.iter() {
            if is_active(v, baseline, tolerance) {
                count += 1;
                if first.is_none() {
                    first = Some((ch, v));
                }
            }
        }

        match (count, first) {
            (1, Some((ch, v))) => Self {
                verdict: GearVerdict::from_channel(ch),
                active_count: 1,
                active: Some(ch),
                active_value: Some(v),
                differential: Some(i32::from(v).abs_diff(baseline)),
            },
            (0, _) => Self {
                verdict: GearVerdict::Neutral,
                active_count: 0,
                active: None,
                active_value: None,
                differential: None,
            },
            (n, _) => Self {
                verdict: GearVerdict::Error,
                active_count: n,
                active: None,
                active_value: None,
                differential: None,
            },
        }
    }
}
