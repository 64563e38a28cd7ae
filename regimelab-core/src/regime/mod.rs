//! Regime detection: classifies the behavioral state of a price series.
//!
//! Two detectors share one result type:
//! - [`AlligatorDetector`]: SLEEPING / EATING / SATED from three smoothed lines.
//! - [`TrendStrengthDetector`]: TRENDING / RANGING from directional movement.
//!
//! Results are value objects: built fresh per call, never mutated. Insufficient
//! data is not an error; it yields [`RegimeResult::unknown`].

pub mod alligator;
pub mod legacy;
pub mod trend_strength;

pub use alligator::{AlligatorDetector, AlligatorLines};
pub use legacy::{to_legacy, LegacyRegimeRecord};
pub use trend_strength::{TrendReadings, TrendStrengthDetector};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{AlligatorConfig, ConfigError, PipelineConfig, RegimeModel, TrendStrengthConfig};
use crate::domain::{PriceBar, TradeDirection, TrendDirection};

/// Market state as classified by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegimeState {
    /// Lines intertwined: choppy market.
    Sleeping,
    /// Lines fanned out and ordered: trending market.
    Eating,
    /// Lines ordered but converging: trend exhaustion.
    Sated,
    /// Directional strength at or above threshold.
    Trending,
    /// Directional strength below threshold.
    Ranging,
    Unknown,
}

impl RegimeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sleeping => "SLEEPING",
            Self::Eating => "EATING",
            Self::Sated => "SATED",
            Self::Trending => "TRENDING",
            Self::Ranging => "RANGING",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Actively trending condition; the only states that permit new positions.
    pub fn is_tradeable(&self) -> bool {
        matches!(self, Self::Eating | Self::Trending)
    }
}

impl fmt::Display for RegimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest line values behind a classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegimeLines {
    Alligator { jaw: f64, teeth: f64, lips: f64 },
    TrendStrength { adx: f64, ema: f64, close: f64 },
    Empty,
}

/// Output of one detector call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub model: RegimeModel,
    pub state: RegimeState,
    pub direction: TrendDirection,
    pub lines: RegimeLines,
    /// Normalized line spread (Alligator) or directional strength (trend model). Always >= 0.
    pub strength: f64,
    /// Threshold `strength` was classified against.
    pub threshold: f64,
    /// |close - EMA| / EMA * 100 for the trend model, 0 otherwise.
    pub trend_strength: f64,
    pub tradeable: bool,
}

impl RegimeResult {
    /// Default for insufficient or undefined data: UNKNOWN and not tradeable.
    pub fn unknown(model: RegimeModel, threshold: f64) -> Self {
        Self {
            model,
            state: RegimeState::Unknown,
            direction: TrendDirection::Unknown,
            lines: RegimeLines::Empty,
            strength: 0.0,
            threshold,
            trend_strength: 0.0,
            tradeable: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.state.as_str()
    }

    /// True only when tradeable and the trend points the signal's way.
    pub fn is_aligned(&self, signal: TradeDirection) -> bool {
        self.tradeable && signal.agrees_with(self.direction)
    }

    /// Name of the strength measure for human-readable text.
    pub fn strength_label(&self) -> &'static str {
        match self.model {
            RegimeModel::Alligator => "spread",
            RegimeModel::TrendStrength => "ADX",
        }
    }

    /// Strength vs. threshold, e.g. `ADX: 18.0 < 25.0` or `spread: 0.0009 < 0.0015`.
    pub fn strength_summary(&self) -> String {
        let cmp = if self.strength < self.threshold { "<" } else { ">=" };
        match self.model {
            RegimeModel::Alligator => format!(
                "{}: {:.4} {cmp} {:.4}",
                self.strength_label(),
                self.strength,
                self.threshold
            ),
            RegimeModel::TrendStrength => format!(
                "{}: {:.1} {cmp} {:.1}",
                self.strength_label(),
                self.strength,
                self.threshold
            ),
        }
    }
}

/// Trait for regime detectors.
///
/// Detectors are pure: the same bars and configuration always produce the
/// same result, and nothing is retained between calls.
pub trait RegimeDetector: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> RegimeModel;

    /// Fewer bars than this yields an UNKNOWN, untradeable result.
    fn min_bars(&self) -> usize;

    fn detect(&self, bars: &[PriceBar]) -> RegimeResult;

    /// Whether `signal` may be taken under `result`.
    fn is_aligned(&self, signal: TradeDirection, result: &RegimeResult) -> bool {
        result.is_aligned(signal)
    }
}

/// Build the detector selected by `config.model`.
pub fn create_detector(config: &PipelineConfig) -> Result<Box<dyn RegimeDetector>, ConfigError> {
    match config.model {
        RegimeModel::Alligator => Ok(Box::new(AlligatorDetector::new(config.alligator.clone())?)),
        RegimeModel::TrendStrength => Ok(Box::new(TrendStrengthDetector::new(config.trend.clone())?)),
    }
}

/// Classify `bars` with an Alligator detector built from `config`.
pub fn detect_alligator_state(
    bars: &[PriceBar],
    config: &AlligatorConfig,
) -> Result<RegimeResult, ConfigError> {
    Ok(AlligatorDetector::new(config.clone())?.detect(bars))
}

/// Classify `bars` with a trend-strength detector built from `config`.
pub fn detect_trend_strength(
    bars: &[PriceBar],
    config: &TrendStrengthConfig,
) -> Result<RegimeResult, ConfigError> {
    Ok(TrendStrengthDetector::new(config.clone())?.detect(bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tradeable(direction: TrendDirection) -> RegimeResult {
        RegimeResult {
            model: RegimeModel::TrendStrength,
            state: RegimeState::Trending,
            direction,
            lines: RegimeLines::TrendStrength {
                adx: 30.0,
                ema: 100.0,
                close: 101.0,
            },
            strength: 30.0,
            threshold: 25.0,
            trend_strength: 1.0,
            tradeable: true,
        }
    }

    #[test]
    fn unknown_is_untradeable() {
        let r = RegimeResult::unknown(RegimeModel::Alligator, 0.0015);
        assert_eq!(r.state, RegimeState::Unknown);
        assert_eq!(r.direction, TrendDirection::Unknown);
        assert!(!r.tradeable);
        assert_eq!(r.strength, 0.0);
    }

    #[test]
    fn alignment_requires_tradeable() {
        let mut r = tradeable(TrendDirection::Up);
        assert!(r.is_aligned(TradeDirection::Long));
        assert!(!r.is_aligned(TradeDirection::Short));
        r.tradeable = false;
        assert!(!r.is_aligned(TradeDirection::Long));
    }

    #[test]
    fn down_trend_aligns_with_short() {
        let r = tradeable(TrendDirection::Down);
        assert!(r.is_aligned(TradeDirection::Short));
        assert!(!r.is_aligned(TradeDirection::Long));
        assert!(!r.is_aligned(TradeDirection::None));
    }

    #[test]
    fn only_eating_and_trending_are_tradeable_states() {
        assert!(RegimeState::Eating.is_tradeable());
        assert!(RegimeState::Trending.is_tradeable());
        assert!(!RegimeState::Sated.is_tradeable());
        assert!(!RegimeState::Sleeping.is_tradeable());
        assert!(!RegimeState::Ranging.is_tradeable());
        assert!(!RegimeState::Unknown.is_tradeable());
    }

    #[test]
    fn strength_summary_formats() {
        let mut r = tradeable(TrendDirection::Up);
        r.strength = 18.0;
        assert_eq!(r.strength_summary(), "ADX: 18.0 < 25.0");

        let mut a = RegimeResult::unknown(RegimeModel::Alligator, 0.0015);
        a.strength = 0.0009;
        assert_eq!(a.strength_summary(), "spread: 0.0009 < 0.0015");
        a.strength = 0.004;
        assert_eq!(a.strength_summary(), "spread: 0.0040 >= 0.0015");
    }

    #[test]
    fn factory_follows_model() {
        let mut config = PipelineConfig::default();
        assert_eq!(create_detector(&config).unwrap().model(), RegimeModel::Alligator);
        config.model = RegimeModel::TrendStrength;
        let detector = create_detector(&config).unwrap();
        assert_eq!(detector.name(), "trend_strength");
    }

    #[test]
    fn factory_rejects_bad_config() {
        let mut config = PipelineConfig::default();
        config.alligator.lips.period = 0;
        assert!(create_detector(&config).is_err());
    }

    #[test]
    fn result_serializes_with_tagged_lines() {
        let json = serde_json::to_value(tradeable(TrendDirection::Up)).unwrap();
        assert_eq!(json["state"], "TRENDING");
        assert_eq!(json["direction"], "UP");
        assert_eq!(json["lines"]["kind"], "trend_strength");
        assert_eq!(json["model"], "trend_strength");
    }
}
