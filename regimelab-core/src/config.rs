//! Serializable configuration for detectors, scorer and decision engine.
//!
//! Every section defaults to the documented values, so an empty TOML document
//! is a valid configuration. Values are validated once at construction time;
//! `ConfigError` is the only error the core ever returns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration. Fatal: surfaced to the caller at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid period for {name}: {value} (must be >= 1)")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("invalid threshold for {name}: {value} (must be finite and >= 0)")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid weight for {name}: {reason}")]
    InvalidWeight { name: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Upper bound of a signal score and of quality points.
pub const MAX_SCORE: u32 = 100;

fn check_period(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidPeriod { name, value });
    }
    Ok(())
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidThreshold { name, value });
    }
    Ok(())
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Which regime detector a pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeModel {
    /// Three smoothed midpoint lines (jaw/teeth/lips).
    #[default]
    Alligator,
    /// Directional-movement strength plus close vs. EMA.
    TrendStrength,
}

impl RegimeModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alligator => "alligator",
            Self::TrendStrength => "trend_strength",
        }
    }
}

// ─── Alligator ───────────────────────────────────────────────────────

/// Period and forward display offset of one smoothed line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub period: usize,
    pub offset: usize,
}

impl LineSpec {
    pub const fn new(period: usize, offset: usize) -> Self {
        Self { period, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlligatorConfig {
    /// Normalized spread below which the lines count as intertwined.
    pub sleep_threshold: f64,
    /// Minimum bars regardless of the jaw period.
    pub min_bars: usize,
    /// Trailing window (including the latest bar) inspected for convergence.
    pub sated_lookback: usize,
    /// Current spread below `sated_ratio` x the historical mean means SATED.
    pub sated_ratio: f64,
    pub jaw: LineSpec,
    pub teeth: LineSpec,
    pub lips: LineSpec,
}

impl Default for AlligatorConfig {
    fn default() -> Self {
        Self {
            sleep_threshold: 0.0015,
            min_bars: 20,
            sated_lookback: 5,
            sated_ratio: 0.9,
            jaw: LineSpec::new(13, 8),
            teeth: LineSpec::new(8, 5),
            lips: LineSpec::new(5, 3),
        }
    }
}

impl AlligatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period("jaw_period", self.jaw.period)?;
        check_period("teeth_period", self.teeth.period)?;
        check_period("lips_period", self.lips.period)?;
        check_period("sated_lookback", self.sated_lookback)?;
        check_threshold("sleep_threshold", self.sleep_threshold)?;
        check_threshold("sated_ratio", self.sated_ratio)?;
        Ok(())
    }

    /// Bars required before the detector classifies anything.
    pub fn required_bars(&self) -> usize {
        self.jaw.period.max(self.min_bars)
    }
}

// ─── Trend strength ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendStrengthConfig {
    /// Strength at or above this value is TRENDING.
    pub strength_threshold: f64,
    /// EMA span for trend direction.
    pub trend_period: usize,
    /// Smoothing span for the directional-movement index.
    pub dmi_period: usize,
}

impl Default for TrendStrengthConfig {
    fn default() -> Self {
        Self {
            strength_threshold: 25.0,
            trend_period: 50,
            dmi_period: 14,
        }
    }
}

impl TrendStrengthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("strength_threshold", self.strength_threshold)?;
        check_period("trend_period", self.trend_period)?;
        check_period("dmi_period", self.dmi_period)?;
        Ok(())
    }
}

// ─── Scorer ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Points per active momentum-flow field.
    pub momentum_weight: u32,
    pub momentum_cap: u32,
    pub zone_weight: u32,
    pub alligator_weight: u32,
    pub strong_threshold: f64,
    pub strength_bonus: u32,
    pub good_threshold: f64,
    pub good_bonus: u32,
    pub htf_bonus: u32,
    /// Target distance as a multiple of the stop distance.
    pub risk_reward: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            momentum_weight: 10,
            momentum_cap: 50,
            zone_weight: 15,
            alligator_weight: 10,
            strong_threshold: 40.0,
            strength_bonus: 15,
            good_threshold: 30.0,
            good_bonus: 8,
            htf_bonus: 10,
            risk_reward: 2.0,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("strong_threshold", self.strong_threshold)?;
        check_threshold("good_threshold", self.good_threshold)?;
        if self.good_bonus > self.strength_bonus {
            return Err(ConfigError::InvalidWeight {
                name: "good_bonus",
                reason: format!(
                    "{} exceeds strength_bonus {}",
                    self.good_bonus, self.strength_bonus
                ),
            });
        }
        if !self.risk_reward.is_finite() || self.risk_reward <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                name: "risk_reward",
                reason: format!("{} must be finite and > 0", self.risk_reward),
            });
        }
        let total = [
            self.zone_weight,
            self.alligator_weight,
            self.strength_bonus,
            self.htf_bonus,
        ]
        .iter()
        .try_fold(self.momentum_cap, |acc, w| acc.checked_add(*w));
        match total {
            Some(total) if total <= MAX_SCORE => Ok(()),
            Some(total) => Err(ConfigError::InvalidWeight {
                name: "scorer",
                reason: format!("component caps sum to {total}, above {MAX_SCORE}"),
            }),
            None => Err(ConfigError::InvalidWeight {
                name: "scorer",
                reason: "component caps overflow".to_string(),
            }),
        }
    }

    /// Highest total the configured caps allow.
    pub fn max_total(&self) -> u32 {
        self.momentum_cap
            .saturating_add(self.zone_weight)
            .saturating_add(self.alligator_weight)
            .saturating_add(self.strength_bonus)
            .saturating_add(self.htf_bonus)
    }
}

// ─── Decision ────────────────────────────────────────────────────────

/// Signal-quality contributions, in hundredths of a point.
///
/// Integer hundredths keep the sum exact; the quality score is `points / 100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    /// Strength > 0.7.
    pub strong: u32,
    /// Strength > 0.5.
    pub moderate: u32,
    /// Strength > 0.3.
    pub weak: u32,
    /// Signal belongs to the momentum-flow family.
    pub momentum_family: u32,
    /// At least two confirming sub-signals.
    pub confirmation: u32,
    /// Weekly or daily timeframe.
    pub higher_timeframe: u32,
    /// Four-hour timeframe.
    pub medium_timeframe: u32,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            strong: 30,
            moderate: 20,
            weak: 10,
            momentum_family: 30,
            confirmation: 20,
            higher_timeframe: 20,
            medium_timeframe: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Quality below this value means WAIT.
    pub quality_threshold: f64,
    pub weights: QualityWeights,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            quality_threshold: 0.5,
            weights: QualityWeights::default(),
        }
    }
}

impl QualityWeights {
    /// Each contribution is at most a full point (100 hundredths).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("strong", self.strong),
            ("moderate", self.moderate),
            ("weak", self.weak),
            ("momentum_family", self.momentum_family),
            ("confirmation", self.confirmation),
            ("higher_timeframe", self.higher_timeframe),
            ("medium_timeframe", self.medium_timeframe),
        ];
        for (name, value) in weights {
            if value > MAX_SCORE {
                return Err(ConfigError::InvalidWeight {
                    name,
                    reason: format!("{value} hundredths exceeds {MAX_SCORE}"),
                });
            }
        }
        Ok(())
    }
}

impl DecisionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("quality_threshold", self.quality_threshold, 0.0, 1.0)?;
        self.weights.validate()
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────

/// Complete configuration of one detect → score → decide pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub model: RegimeModel,
    pub alligator: AlligatorConfig,
    pub trend: TrendStrengthConfig,
    pub scorer: ScorerConfig,
    pub decision: DecisionConfig,
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.alligator.validate()?;
        self.trend.validate()?;
        self.scorer.validate()?;
        self.decision.validate()?;
        Ok(())
    }

    /// Content hash of the configuration (blake3 over canonical JSON).
    ///
    /// Two identical configurations always produce the same fingerprint, so
    /// decision logs can be tied back to the exact parameters that made them.
    pub fn fingerprint(&self) -> String {
        match serde_json::to_vec(self) {
            Ok(bytes) => blake3::hash(&bytes).to_hex().to_string(),
            Err(_) => String::new(),
        }
    }
}
