//! Entry, stop and target levels for a scored signal.

use serde::{Deserialize, Serialize};

use super::extract::{CLOSE, FRACTAL_HIGH, FRACTAL_LOW};
use crate::domain::{IndicatorRow, TradeDirection};

/// Fallback stop distance when no fractal is available (0.5%).
const FALLBACK_STOP_FRACTION: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    /// |target - entry| / |entry - stop|, 0 when the stop sits on the entry.
    pub risk_reward: f64,
}

/// Most recent non-missing value of `field`, scanning backwards.
fn last_confirmed(rows: &[IndicatorRow], field: &str) -> Option<f64> {
    rows.iter().rev().find_map(|row| row.number(field))
}

/// Levels for `direction`, entering at the latest close.
///
/// Stops sit on the most recent confirmed fractal low (LONG) or high (SHORT)
/// anywhere in `rows`, else 0.5% away from the entry.
pub fn trade_levels(rows: &[IndicatorRow], direction: TradeDirection, risk_reward: f64) -> TradeLevels {
    let entry = rows.last().and_then(|row| row.number(CLOSE)).unwrap_or(0.0);

    let (stop, target) = match direction {
        TradeDirection::Long => {
            let stop = last_confirmed(rows, FRACTAL_LOW).unwrap_or(entry * (1.0 - FALLBACK_STOP_FRACTION));
            (stop, entry + (entry - stop) * risk_reward)
        }
        TradeDirection::Short => {
            let stop = last_confirmed(rows, FRACTAL_HIGH).unwrap_or(entry * (1.0 + FALLBACK_STOP_FRACTION));
            (stop, entry - (stop - entry) * risk_reward)
        }
        TradeDirection::None => (entry, entry),
    };

    let risk = (entry - stop).abs();
    let realized = if risk > 0.0 {
        (target - entry).abs() / risk
    } else {
        0.0
    };

    TradeLevels {
        entry,
        stop,
        target,
        risk_reward: if realized.is_finite() { realized } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn long_uses_latest_fractal_low() {
        let rows = vec![
            IndicatorRow::new().with("fl", 1.0950).with("Close", 1.1000),
            IndicatorRow::new().with("fl", 1.0980).with("Close", 1.1010),
            IndicatorRow::new().with("fl", f64::NAN).with("Close", 1.1050),
        ];
        let levels = trade_levels(&rows, TradeDirection::Long, 2.0);
        assert_eq!(levels.entry, 1.1050);
        assert_eq!(levels.stop, 1.0980);
        assert_approx(levels.target, 1.1050 + (1.1050 - 1.0980) * 2.0, 1e-12);
        assert_approx(levels.risk_reward, 2.0, 1e-9);
    }

    #[test]
    fn long_without_fractal_uses_half_percent() {
        let rows = vec![IndicatorRow::new().with("Close", 200.0)];
        let levels = trade_levels(&rows, TradeDirection::Long, 2.0);
        assert_approx(levels.stop, 199.0, 1e-9);
        assert_approx(levels.target, 202.0, 1e-9);
    }

    #[test]
    fn short_mirrors_with_fractal_high() {
        let rows = vec![
            IndicatorRow::new().with("fh", 105.0),
            IndicatorRow::new().with("Close", 100.0),
        ];
        let levels = trade_levels(&rows, TradeDirection::Short, 3.0);
        assert_eq!(levels.stop, 105.0);
        assert_eq!(levels.target, 85.0);
        assert_approx(levels.risk_reward, 3.0, 1e-12);

        let fallback = trade_levels(&rows[1..], TradeDirection::Short, 2.0);
        assert_approx(fallback.stop, 100.5, 1e-9);
        assert_approx(fallback.target, 99.0, 1e-9);
    }

    #[test]
    fn stop_on_entry_gives_zero_ratio() {
        let rows = vec![IndicatorRow::new().with("fl", 50.0).with("Close", 50.0)];
        let levels = trade_levels(&rows, TradeDirection::Long, 2.0);
        assert_eq!(levels.risk_reward, 0.0);
        assert_eq!(levels.target, 50.0);
    }

    #[test]
    fn missing_close_enters_at_zero() {
        let levels = trade_levels(&[IndicatorRow::new()], TradeDirection::Long, 2.0);
        assert_eq!(levels.entry, 0.0);
        assert_eq!(levels.risk_reward, 0.0);
    }
}
