//! Indicator implementations used by the regime detectors.
//!
//! Indicators are pure functions: bar history in, numeric series out, same
//! length as the input with `f64::NAN` marking undefined (warm-up) entries.
//!
//! - [`SmoothedLine`]: Wilder smoothed moving average of bar midpoints
//!   (the Alligator jaw/teeth/lips lines).
//! - [`Ewm`]: recursive exponential smoothing of closes, seeded on the first bar.
//! - [`DirectionalIndex`]: directional-movement trend strength (ADX-equivalent).

pub mod dmi;
pub mod ewm;
pub mod smma;

pub use dmi::{directional_index, true_range, DirectionalIndex, DmiSeries};
pub use ewm::{ewm, Ewm};
pub use smma::{smma, SmoothedLine};

use crate::domain::PriceBar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN`.
///
/// # Look-ahead guard
/// No value at bar t may depend on data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "smma_13", "ewm_50").
    fn name(&self) -> &str;

    /// Number of leading entries that are undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Latest value of a series, `None` if empty or NaN.
pub fn last_value(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}

/// Create synthetic bars from midpoints for testing.
///
/// high = mid + 0.5, low = mid - 0.5, close = mid; one bar per day.
#[cfg(test)]
pub fn make_bars(mids: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    mids.iter()
        .enumerate()
        .map(|(i, &mid)| {
            PriceBar::new(base + chrono::Duration::days(i as i64), mid + 0.5, mid - 0.5, mid)
        })
        .collect()
}

/// Create bars from explicit (high, low, close) triples for testing.
#[cfg(test)]
pub fn make_hlc_bars(data: &[(f64, f64, f64)]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| {
            PriceBar::new(base + chrono::Duration::days(i as i64), high, low, close)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
