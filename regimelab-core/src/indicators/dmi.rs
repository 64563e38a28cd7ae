//! Directional Movement Index: trend strength (ADX-equivalent).
//!
//! Steps:
//! 1. True range per bar: max(high-low, |high-prev_close|, |low-prev_close|)
//! 2. +DM / -DM from consecutive high/low diffs; each is zeroed unless it is
//!    positive and strictly exceeds the opposite movement
//! 3. Smooth TR, +DM, -DM with exponential smoothing (span = period)
//! 4. +DI / -DI = 100 * smoothed DM / smoothed TR (0 when smoothed TR is 0)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI), with a zero denominator replaced by 1
//! 6. Strength = exponential smoothing of DX over the same span
//!
//! All smoothing is seeded on the first bar, so output is defined from bar 0;
//! it only becomes meaningful after a couple of periods.

use super::ewm::ewm;
use super::Indicator;
use crate::domain::PriceBar;

/// True range series. TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    let first = &bars[0];
    if !first.high.is_nan() && !first.low.is_nan() {
        tr[0] = first.high - first.low;
    }

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// +DM and -DM series. Bar 0 has no predecessor and contributes zero movement.
fn directional_movement(bars: &[PriceBar]) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let (cur, prev) = (&bars[i], &bars[i - 1]);
        if cur.high.is_nan() || cur.low.is_nan() || prev.high.is_nan() || prev.low.is_nan() {
            plus_dm[i] = f64::NAN;
            minus_dm[i] = f64::NAN;
            continue;
        }

        let up = cur.high - prev.high;
        let down = prev.low - cur.low;

        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    (plus_dm, minus_dm)
}

/// Intermediate and final series of the directional-movement computation.
#[derive(Debug, Clone)]
pub struct DmiSeries {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub dx: Vec<f64>,
    pub adx: Vec<f64>,
}

/// Compute +DI, -DI, DX and the smoothed trend strength for a bar series.
pub fn directional_index(bars: &[PriceBar], period: usize) -> DmiSeries {
    let n = bars.len();
    let tr = true_range(bars);
    let (plus_dm, minus_dm) = directional_movement(bars);

    let smooth_tr = ewm(&tr, period);
    let smooth_plus = ewm(&plus_dm, period);
    let smooth_minus = ewm(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];

    for i in 0..n {
        let (atr, sp, sm) = (smooth_tr[i], smooth_plus[i], smooth_minus[i]);
        if atr.is_nan() || sp.is_nan() || sm.is_nan() {
            continue;
        }

        let (p, m) = if atr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * sp / atr, 100.0 * sm / atr)
        };
        plus_di[i] = p;
        minus_di[i] = m;

        let di_sum = p + m;
        let denom = if di_sum == 0.0 { 1.0 } else { di_sum };
        dx[i] = 100.0 * (p - m).abs() / denom;
    }

    let adx = ewm(&dx, period);

    DmiSeries {
        plus_di,
        minus_di,
        dx,
        adx,
    }
}

/// Directional-movement trend strength as an [`Indicator`].
#[derive(Debug, Clone)]
pub struct DirectionalIndex {
    period: usize,
    name: String,
}

impl DirectionalIndex {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("dmi_{period}"),
        }
    }
}

impl Indicator for DirectionalIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        directional_index(bars, self.period).adx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_hlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_uses_previous_close() {
        let bars = make_hlc_bars(&[(105.0, 95.0, 100.0), (112.0, 108.0, 110.0)]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        // max(4, |112-100|, |108-100|) = 12
        assert_approx(tr[1], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn equal_movements_cancel() {
        // high +2, low -2: neither side strictly dominates
        let bars = make_hlc_bars(&[(101.0, 99.0, 100.0), (103.0, 97.0, 100.0)]);
        let (plus, minus) = directional_movement(&bars);
        assert_eq!(plus[1], 0.0);
        assert_eq!(minus[1], 0.0);
    }

    #[test]
    fn dominant_movement_kept() {
        let bars = make_hlc_bars(&[(101.0, 99.0, 100.0), (104.0, 98.0, 103.0)]);
        let (plus, minus) = directional_movement(&bars);
        assert_eq!(plus[1], 3.0);
        assert_eq!(minus[1], 0.0);
    }

    #[test]
    fn strength_bounded_0_100() {
        let bars = make_hlc_bars(&[
            (105.0, 95.0, 102.0),
            (108.0, 100.0, 106.0),
            (107.0, 98.0, 99.0),
            (103.0, 97.0, 101.0),
            (106.0, 100.0, 105.0),
            (110.0, 103.0, 108.0),
            (112.0, 106.0, 110.0),
            (111.0, 104.0, 105.0),
            (109.0, 103.0, 107.0),
            (113.0, 105.0, 112.0),
        ]);
        let adx = DirectionalIndex::new(3).compute(&bars);
        for (i, &v) in adx.iter().enumerate() {
            assert!((0.0..=100.0).contains(&v), "strength out of bounds at bar {i}: {v}");
        }
    }

    #[test]
    fn steady_uptrend_is_strong() {
        let data: Vec<(f64, f64, f64)> = (0..60)
            .map(|i| {
                let c = 100.0 + i as f64;
                (c + 0.5, c - 0.5, c)
            })
            .collect();
        let series = directional_index(&make_hlc_bars(&data), 14);
        let last = *series.adx.last().unwrap();
        assert!(last > 50.0, "expected strong trend, got {last}");
        assert!(series.plus_di[59] > series.minus_di[59]);
    }

    #[test]
    fn flat_market_has_zero_strength() {
        let bars = make_hlc_bars(&[(101.0, 99.0, 100.0); 30]);
        let series = directional_index(&bars, 14);
        assert!(series.adx.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_range_bars_do_not_divide_by_zero() {
        let bars = make_hlc_bars(&[(100.0, 100.0, 100.0); 5]);
        let series = directional_index(&bars, 3);
        assert!(series.adx.iter().all(|v| v.is_finite()));
        assert!(series.plus_di.iter().all(|&v| v == 0.0));
    }
}
