//! Multi-factor signal scoring.
//!
//! A scored signal combines five independently capped components:
//!
//! | Component | Default cap |
//! |---|---|
//! | momentum-flow signals | 50 |
//! | zone color alignment | 15 |
//! | Alligator label alignment | 10 |
//! | regime strength bonus | 15 |
//! | higher-timeframe confirmation | 10 |
//!
//! The total is always the plain sum of the capped components.

pub mod extract;
pub mod trade;

pub use extract::{resolve_direction, ActiveSignals, AlligatorLabel};
pub use trade::{trade_levels, TradeLevels};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, ScorerConfig};
use crate::decision::SignalCandidate;
use crate::domain::{FieldValue, IndicatorRow, TradeDirection};
use crate::regime::RegimeResult;
use extract::zone_color_for;

/// Points for each of the two higher-timeframe checks.
const HTF_CHECK_POINTS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mfi_score: u32,
    pub zone_score: u32,
    pub alligator_score: u32,
    pub strength_bonus: u32,
    pub htf_bonus: u32,
    pub total: u32,
    pub factors: Vec<String>,
}

impl ScoreBreakdown {
    pub fn component_sum(&self) -> u32 {
        self.mfi_score
            .saturating_add(self.zone_score)
            .saturating_add(self.alligator_score)
            .saturating_add(self.strength_bonus)
            .saturating_add(self.htf_bonus)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSignal {
    pub instrument: String,
    pub timeframe: String,
    pub direction: TradeDirection,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
    pub risk_reward: f64,
    /// Regime state label at scoring time.
    pub regime: String,
    /// Regime strength at scoring time.
    pub strength: f64,
    /// Zone color, empty when the row had none.
    pub zone: String,
    pub active_signals: BTreeMap<String, FieldValue>,
}

impl ScoredSignal {
    /// Zero-score, direction-less signal for an empty input.
    pub fn empty(instrument: &str, timeframe: &str) -> Self {
        Self {
            instrument: instrument.to_string(),
            timeframe: timeframe.to_string(),
            direction: TradeDirection::None,
            score: 0,
            breakdown: ScoreBreakdown::default(),
            entry_price: 0.0,
            stop_price: 0.0,
            target_price: 0.0,
            risk_reward: 0.0,
            regime: String::new(),
            strength: 0.0,
            zone: String::new(),
            active_signals: BTreeMap::new(),
        }
    }

    /// Input for the decision engine.
    pub fn candidate(&self) -> SignalCandidate {
        let signals: ActiveSignals = self.active_signals.clone().into();
        SignalCandidate {
            instrument: self.instrument.clone(),
            timeframe: self.timeframe.clone(),
            direction: self.direction,
            strength: f64::from(self.score) / 100.0,
            signal_group: signals.signal_group().unwrap_or_default().to_string(),
            valid_signals: signals.confirmations(),
            entry_price: (self.entry_price != 0.0).then_some(self.entry_price),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    config: ScorerConfig,
}

impl SignalScorer {
    pub fn new(config: ScorerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score the latest row of `rows` under `regime`.
    ///
    /// Earlier rows only supply fractal history for the stop.
    pub fn score(
        &self,
        rows: &[IndicatorRow],
        regime: &RegimeResult,
        instrument: &str,
        timeframe: &str,
        htf: Option<&IndicatorRow>,
    ) -> ScoredSignal {
        let Some(latest) = rows.last().filter(|row| !row.is_empty()) else {
            debug!(instrument, timeframe, "empty indicator rows, zero score");
            return ScoredSignal::empty(instrument, timeframe);
        };

        let signals = ActiveSignals::extract(latest);
        let direction = resolve_direction(&signals, regime.direction);
        let breakdown = self.breakdown(&signals, regime, direction, htf);
        let levels = trade_levels(rows, direction, self.config.risk_reward);

        debug!(
            instrument,
            timeframe,
            direction = direction.as_str(),
            total = breakdown.total,
            "signal scored"
        );

        ScoredSignal {
            instrument: instrument.to_string(),
            timeframe: timeframe.to_string(),
            direction,
            score: breakdown.total,
            breakdown,
            entry_price: levels.entry,
            stop_price: levels.stop,
            target_price: levels.target,
            risk_reward: levels.risk_reward,
            regime: regime.label().to_string(),
            strength: regime.strength,
            zone: signals.zone_color().unwrap_or_default().to_string(),
            active_signals: signals.into_map(),
        }
    }

    fn breakdown(
        &self,
        signals: &ActiveSignals,
        regime: &RegimeResult,
        direction: TradeDirection,
        htf: Option<&IndicatorRow>,
    ) -> ScoreBreakdown {
        let cfg = &self.config;
        let mut factors = Vec::new();

        let count = signals.momentum_count();
        let mfi_score = (count as u32).saturating_mul(cfg.momentum_weight).min(cfg.momentum_cap);
        if count > 0 {
            factors.push(format!("MFI: {count} signals"));
        }

        let mut zone_score = 0;
        if let Some(color) = signals.zone_color().filter(|c| Some(*c) == zone_color_for(direction)) {
            zone_score = cfg.zone_weight;
            factors.push(format!("Zone: {color} aligned"));
        }

        let mut alligator_score = 0;
        if let Some(label) = signals.alligator().filter(|l| l.supports(direction)) {
            alligator_score = cfg.alligator_weight;
            factors.push(format!("Alligator: {} aligned", label.as_str()));
        }

        let strength_bonus = if regime.strength >= cfg.strong_threshold {
            factors.push(format!("Strong trend: {:.1}", regime.strength));
            cfg.strength_bonus
        } else if regime.strength >= cfg.good_threshold {
            factors.push(format!("Good trend: {:.1}", regime.strength));
            cfg.good_bonus
        } else {
            0
        };

        let mut htf_bonus = 0;
        if let Some(row) = htf.filter(|row| !row.is_empty()) {
            htf_bonus = self.htf_bonus(row, direction);
            if htf_bonus > 0 {
                factors.push(format!("HTF: confirmed (+{htf_bonus})"));
            } else {
                factors.push("HTF: no alignment".to_string());
            }
        }

        let mut breakdown = ScoreBreakdown {
            mfi_score,
            zone_score,
            alligator_score,
            strength_bonus,
            htf_bonus,
            total: 0,
            factors,
        };
        breakdown.total = breakdown.component_sum();
        breakdown
    }

    /// Zone color on an `htf`-tagged zone column, then any active
    /// Alligator/jaw column; each worth a fixed share, capped together.
    fn htf_bonus(&self, row: &IndicatorRow, direction: TradeDirection) -> u32 {
        let cap = self.config.htf_bonus;
        let mut bonus = 0;

        if let Some(color) = zone_color_for(direction) {
            let zone_match = row.iter().any(|(name, value)| {
                let name = name.to_ascii_lowercase();
                name.contains("zcol") && name.contains("htf") && value.as_text() == Some(color)
            });
            if zone_match {
                bonus += HTF_CHECK_POINTS;
            }
        }

        let lines_active = row.iter().any(|(name, value)| {
            let name = name.to_ascii_lowercase();
            (name.contains("alligator") || name.contains("jaw")) && value.is_active()
        });
        if lines_active {
            bonus = (bonus + HTF_CHECK_POINTS).min(cap);
        }

        bonus.min(cap)
    }
}

/// Score with the default scorer configuration.
pub fn score_signal(
    rows: &[IndicatorRow],
    regime: &RegimeResult,
    instrument: &str,
    timeframe: &str,
    htf: Option<&IndicatorRow>,
) -> ScoredSignal {
    SignalScorer::default().score(rows, regime, instrument, timeframe, htf)
}
