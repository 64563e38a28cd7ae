//! Smoothed Moving Average (SMMA, Wilder smoothing).
//!
//! Seed: SMMA[period-1] = SMA of the first `period` values.
//! Recursive: SMMA[t] = (SMMA[t-1] * (period - 1) + value[t]) / period.
//! Unlike an EMA the weight of a new observation is fixed at 1/period.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::PriceBar;

/// Compute the SMMA of an arbitrary series.
///
/// A series shorter than `period` (or `period == 0`) yields an all-NaN result.
/// A NaN inside the seed window makes the whole output NaN; a NaN after the
/// seed makes it and every later entry NaN.
pub fn smma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let weight = (period - 1) as f64;
    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        let next = (prev * weight + values[i]) / period as f64;
        result[i] = next;
        prev = next;
    }

    result
}

/// One Alligator line: an SMMA of bar midpoints with a display offset.
///
/// The offset only affects [`SmoothedLine::displaced`]; state classification
/// always reads the unshifted current-bar value.
#[derive(Debug, Clone)]
pub struct SmoothedLine {
    period: usize,
    offset: usize,
    name: String,
}

impl SmoothedLine {
    pub fn new(label: &str, period: usize, offset: usize) -> Self {
        Self {
            period,
            offset,
            name: format!("{label}_smma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// SMMA of an already-extracted midpoint series.
    pub fn compute_series(&self, midpoints: &[f64]) -> Vec<f64> {
        smma(midpoints, self.period)
    }

    /// Shift a computed series forward by the display offset.
    ///
    /// Entry `i + offset` takes the value at `i`; the first `offset` entries
    /// are NaN and values shifted past the end are dropped.
    pub fn displaced(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        let mut shifted = vec![f64::NAN; n];
        for (i, &v) in series.iter().enumerate() {
            if let Some(slot) = shifted.get_mut(i + self.offset) {
                *slot = v;
            }
        }
        shifted
    }
}

impl Indicator for SmoothedLine {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mids: Vec<f64> = bars.iter().map(PriceBar::midpoint).collect();
        self.compute_series(&mids)
    }
}
