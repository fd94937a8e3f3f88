//! Periodic diagnostic dump, rate limited independently of the loop cadence.

use core::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::channel::Channel;
use crate::format::format_value;
use crate::mode::{DisplayMode, Tolerance};
use crate::resolver::GearVerdict;
use crate::session::Snapshot;
use crate::stats::to_voltage;

/// Admits at most one dump per `interval`, measured on a monotonic clock.
/// The first call is always admitted.
#[derive(Debug, Clone)]
pub struct DiagnosticGate {
    interval: Duration,
    last: Option<Instant>,
}

impl DiagnosticGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true (and rearms) when a dump is due at `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub channel: Channel,
    pub raw: u16,
    pub volts: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveReport {
    pub channel: Channel,
    pub raw: u16,
    pub volts: f32,
    pub differential: u32,
}

/// Everything the serial dump showed for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub tick: u64,
    pub mode: DisplayMode,
    pub mode_index: usize,
    pub total: i32,
    pub mean: i32,
    pub baseline: i32,
    pub baseline_v: f32,
    pub tolerance: Tolerance,
    pub tolerance_v: f32,
    pub verdict: GearVerdict,
    pub verdict_code: i8,
    pub verdict_symbol: char,
    pub active: Option<ActiveReport>,
    pub channels: Vec<ChannelReport>,
    pub std_dev_v: f32,
}

impl DiagnosticReport {
    pub fn new(tick: u64, mode: DisplayMode, tolerance: Tolerance, snap: &Snapshot) -> Self {
        let res = &snap.resolution;
        let active = match (res.active, res.active_value, res.differential) {
            (Some(channel), Some(raw), Some(differential)) => Some(ActiveReport {
                channel,
                raw,
                volts: to_voltage(i32::from(raw)),
                differential,
            }),
            _ => None,
        };
        Self {
            tick,
            mode,
            mode_index: mode.index(),
            total: snap.stats.total,
            mean: snap.stats.mean,
            baseline: snap.stats.baseline,
            baseline_v: to_voltage(snap.stats.baseline),
            tolerance,
            tolerance_v: tolerance.volts(),
            verdict: res.verdict,
            verdict_code: res.verdict.code(),
            verdict_symbol: res.verdict.symbol(),
            active,
            channels: snap
                .readings
                .iter()
                .map(|(channel, raw)| ChannelReport {
                    channel,
                    raw,
                    volts: to_voltage(i32::from(raw)),
                })
                .collect(),
            std_dev_v: snap.stats.std_dev_v,
        }
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode: {}", self.mode_index)?;
        writeln!(f, "Total: {}", self.total)?;
        let base_fmt = u16::try_from(self.baseline.max(0))
            .map_or_else(|_| "???".to_string(), format_value);
        writeln!(
            f,
            "Average: {} ({}) {:.2}V",
            self.baseline, base_fmt, self.baseline_v
        )?;
        writeln!(
            f,
            "Tolerance: {} {:.2}V",
            self.tolerance.get(),
            self.tolerance_v
        )?;
        writeln!(
            f,
            "In Gear: ** {} ({}) **",
            self.verdict.name(),
            self.verdict_symbol
        )?;
        match &self.active {
            Some(a) => {
                writeln!(f, " - Active Gear: {} {:.2}V", a.raw, a.volts)?;
                writeln!(f, " - Differential: {}", a.differential)?;
            }
            None => {
                writeln!(f, " - Active Gear: N/A")?;
                writeln!(f, " - Differential: N/A")?;
            }
        }
        for c in &self.channels {
            writeln!(
                f,
                "{}: {} ({}) {:.2}V",
                c.channel.label(),
                c.raw,
                format_value(c.raw),
                c.volts
            )?;
        }
        writeln!(f, "Standard Deviation: {:.2}", self.std_dev_v)
    }
}

/// Diagnostic output boundary.
pub trait DiagnosticSink {
    fn emit(&mut self, report: &DiagnosticReport);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Box<T> {
    fn emit(&mut self, report: &DiagnosticReport) {
        (**self).emit(report);
    }
}

/// Sink that forwards the headline fields to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, r: &DiagnosticReport) {
        tracing::info!(
            tick = r.tick,
            mode = %r.mode,
            total = r.total,
            mean = r.mean,
            tolerance = r.tolerance.get(),
            verdict = %r.verdict,
            std_dev_v = r.std_dev_v,
            "diagnostics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_admits_first_then_waits_for_interval() {
        let t0 = Instant::now();
        let mut gate = DiagnosticGate::new(Duration::from_millis(1000));
        assert!(gate.ready(t0));
        assert!(!gate.ready(t0 + Duration::from_millis(999)));
        assert!(gate.ready(t0 + Duration::from_millis(1000)));
        assert!(!gate.ready(t0 + Duration::from_millis(1500)));
        assert!(gate.ready(t0 + Duration::from_millis(2000)));
    }
}
