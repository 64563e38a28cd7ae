//! Exponentially weighted moving average, recursive form.
//!
//! alpha = 2 / (span + 1)
//! Seed: EWM[first] = first defined value (no SMA warm-up window).
//! Recursive: EWM[t] = alpha * value[t] + (1 - alpha) * EWM[t-1].
//! Lookback: 0.

use super::Indicator;
use crate::domain::PriceBar;

/// Exponential smoothing of an arbitrary series with the given span.
///
/// NaN inputs produce NaN at that index and are skipped by the recursion, so
/// the next defined value continues from the last defined average. A zero
/// span yields an all-NaN result.
pub fn ewm(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result[i] = next;
        prev = Some(next);
    }

    result
}

/// EWM of bar closes.
#[derive(Debug, Clone)]
pub struct Ewm {
    span: usize,
    name: String,
}

impl Ewm {
    pub fn new(span: usize) -> Self {
        Self {
            span,
            name: format!("ewm_{span}"),
        }
    }
}

impl Indicator for Ewm {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ewm(&closes, self.span)
    }
}
