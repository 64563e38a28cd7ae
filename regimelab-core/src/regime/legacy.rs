//! Translation into the older flat regime record.
//!
//! Consumers built against the directional-movement detector expect
//! `regime / adx / trend_direction / trend_strength / tradeable`. Alligator
//! results have no directional strength, so those fields are left empty
//! rather than synthesized from the spread.

use serde::{Deserialize, Serialize};

use super::RegimeResult;
use crate::config::RegimeModel;
use crate::domain::TrendDirection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRegimeRecord {
    pub regime: String,
    pub adx: Option<f64>,
    pub trend_direction: TrendDirection,
    pub trend_strength: Option<f64>,
    pub tradeable: bool,
}

/// Map a detector result onto the legacy field names.
pub fn to_legacy(result: &RegimeResult) -> LegacyRegimeRecord {
    let (adx, trend_strength) = match result.model {
        RegimeModel::TrendStrength => (Some(result.strength), Some(result.trend_strength)),
        RegimeModel::Alligator => (None, None),
    };

    LegacyRegimeRecord {
        regime: result.label().to_string(),
        adx,
        trend_direction: result.direction,
        trend_strength,
        tradeable: result.tradeable,
    }
}

impl From<&RegimeResult> for LegacyRegimeRecord {
    fn from(result: &RegimeResult) -> Self {
        to_legacy(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::{RegimeLines, RegimeState};

    #[test]
    fn trend_result_keeps_strength_fields() {
        let result = RegimeResult {
            model: RegimeModel::TrendStrength,
            state: RegimeState::Trending,
            direction: TrendDirection::Down,
            lines: RegimeLines::TrendStrength {
                adx: 31.5,
                ema: 1.10,
                close: 1.08,
            },
            strength: 31.5,
            threshold: 25.0,
            trend_strength: 1.82,
            tradeable: true,
        };

        let legacy = to_legacy(&result);
        assert_eq!(legacy.regime, "TRENDING");
        assert_eq!(legacy.adx, Some(31.5));
        assert_eq!(legacy.trend_strength, Some(1.82));
        assert_eq!(legacy.trend_direction, TrendDirection::Down);
        assert!(legacy.tradeable);
    }

    #[test]
    fn alligator_result_has_no_adx() {
        let mut result = RegimeResult::unknown(RegimeModel::Alligator, 0.0015);
        result.state = RegimeState::Eating;
        result.direction = TrendDirection::Up;
        result.strength = 0.02;
        result.tradeable = true;

        let legacy = LegacyRegimeRecord::from(&result);
        assert_eq!(legacy.regime, "EATING");
        assert_eq!(legacy.adx, None);
        assert_eq!(legacy.trend_strength, None);
        assert_eq!(legacy.trend_direction, TrendDirection::Up);
    }

    #[test]
    fn legacy_serializes_upper_case_direction() {
        let legacy = to_legacy(&RegimeResult::unknown(RegimeModel::TrendStrength, 25.0));
        let json = serde_json::to_value(&legacy).unwrap();
        assert_eq!(json["regime"], "UNKNOWN");
        assert_eq!(json["trend_direction"], "UNKNOWN");
        assert_eq!(json["adx"], 0.0);
    }
}
