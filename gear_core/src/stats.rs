//! Per-tick aggregate statistics over the six channels.
//!
//! All arithmetic is total over the 10-bit input domain: sums of six counts
//! fit comfortably in `i32` and the only division is by the constant channel
//! count.

use gear_traits::CHANNEL_COUNT;

use crate::channel::{ADC_MAX, Readings};

/// Converter reference voltage (full scale).
pub const REFERENCE_VOLTS: f32 = 5.0;

/// Output of an ideal Hall sensor with no field applied (half of full scale).
pub const THEORETICAL_MIDPOINT: i32 = 511;

/// Convert a raw count (or a difference of counts) to volts.
#[inline]
pub fn to_voltage(raw: i32) -> f32 {
    raw as f32 * REFERENCE_VOLTS / f32::from(ADC_MAX)
}

/// Sum of all six readings.
pub fn total(readings: &Readings) -> i32 {
    readings.as_array().iter().map(|&v| i32::from(v)).sum()
}

/// Arithmetic mean of the six readings, truncated toward zero.
pub fn mean(readings: &Readings) -> i32 {
    total(readings) / CHANNEL_COUNT as i32
}

/// Population standard deviation, in volts, of each channel's deviation
/// from `baseline`.
pub fn standard_deviation(readings: &Readings, baseline: i32) -> f32 {
    let variance = readings
        .as_array()
        .iter()
        .map(|&v| to_voltage(i32::from(v) - baseline).powi(2))
        .sum::<f32>()
        / CHANNEL_COUNT as f32;
    variance.sqrt()
}

/// Reference the resolver measures deviations against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineMethod {
    /// Mean of the current tick's readings.
    #[default]
    Mean,
    /// Fixed ideal sensor midpoint, independent of the readings.
    Theoretical,
}

impl BaselineMethod {
    pub fn baseline(self, readings: &Readings) -> i32 {
        match self {
            BaselineMethod::Mean => mean(readings),
            BaselineMethod::Theoretical => THEORETICAL_MIDPOINT,
        }
    }
}

/// Statistics computed once per tick and shared by resolver, diagnostics and
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickStats {
    pub total: i32,
    pub mean: i32,
    /// Reference used for activity classification.
    pub baseline: i32,
    /// Standard deviation around `baseline`, in volts.
    pub std_dev_v: f32,
}

impl TickStats {
    pub fn compute(readings: &Readings, method: BaselineMethod) -> Self {
        let baseline = method.baseline(readings);
        Self {
            total: total(readings),
            mean: mean(readings),
            baseline,
            std_dev_v: standard_deviation(readings, baseline),
        }
    }
}
