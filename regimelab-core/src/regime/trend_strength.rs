//! Trend-strength detector (directional movement + EMA direction).
//!
//! TRENDING when the latest directional strength is at or above the
//! threshold, RANGING otherwise. Direction comes from the latest close
//! against an EMA of closes over `trend_period`.

use tracing::debug;

use super::{RegimeDetector, RegimeLines, RegimeResult, RegimeState};
use crate::config::{ConfigError, RegimeModel, TrendStrengthConfig};
use crate::domain::{PriceBar, TrendDirection};
use crate::indicators::{directional_index, ewm, last_value};

/// Latest indicator readings computed elsewhere. `None` fields are derived
/// from the bars; a NaN strength reads as 0 and a NaN EMA as the close.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendReadings {
    pub adx: Option<f64>,
    pub ema: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TrendStrengthDetector {
    config: TrendStrengthConfig,
}

impl TrendStrengthDetector {
    pub fn new(config: TrendStrengthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrendStrengthConfig {
        &self.config
    }

    /// Classify `bars`, taking any reading present in `readings` as given.
    pub fn detect_with_readings(&self, bars: &[PriceBar], readings: TrendReadings) -> RegimeResult {
        let threshold = self.config.strength_threshold;

        let Some(latest) = bars.last().filter(|_| bars.len() >= self.min_bars()) else {
            debug!(bars = bars.len(), "trend strength: insufficient data");
            return RegimeResult::unknown(RegimeModel::TrendStrength, threshold);
        };
        let close = latest.close;

        let adx = match readings.adx {
            Some(adx) if adx.is_finite() && adx >= 0.0 => adx,
            Some(_) => 0.0,
            None => last_value(&directional_index(bars, self.config.dmi_period).adx).unwrap_or(0.0),
        };

        let ema = match readings.ema {
            Some(ema) if ema.is_finite() => ema,
            Some(_) => close,
            None => {
                let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
                last_value(&ewm(&closes, self.config.trend_period)).unwrap_or(close)
            }
        };

        let direction = if close > ema {
            TrendDirection::Up
        } else if close < ema {
            TrendDirection::Down
        } else {
            TrendDirection::Unknown
        };

        let trend_strength = if ema != 0.0 {
            (close - ema).abs() / ema * 100.0
        } else {
            0.0
        };
        let trend_strength = if trend_strength.is_finite() { trend_strength } else { 0.0 };

        let state = if adx >= threshold {
            RegimeState::Trending
        } else {
            RegimeState::Ranging
        };

        debug!(
            state = state.as_str(),
            direction = direction.as_str(),
            adx,
            "trend strength classified"
        );

        RegimeResult {
            model: RegimeModel::TrendStrength,
            state,
            direction,
            lines: RegimeLines::TrendStrength { adx, ema, close },
            strength: adx,
            threshold,
            trend_strength,
            tradeable: state.is_tradeable(),
        }
    }
}

impl RegimeDetector for TrendStrengthDetector {
    fn name(&self) -> &str {
        "trend_strength"
    }

    fn model(&self) -> RegimeModel {
        RegimeModel::TrendStrength
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect(&self, bars: &[PriceBar]) -> RegimeResult {
        self.detect_with_readings(bars, TrendReadings::default())
    }
}
