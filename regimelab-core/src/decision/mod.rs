//! Regime-aware trade decisions.
//!
//! `DecisionEngine::decide` is a total function over (signal, regime):
//!
//! 1. regime not tradeable          → SKIP
//! 2. known directions that conflict → SKIP
//! 3. quality below threshold       → WAIT
//! 4. otherwise                     → TRADE
//!
//! No state is kept between calls.

pub mod batch;
pub mod quality;

pub use batch::{rank_trades, signal_key, SignalKey};
pub use quality::{assess_quality, QualityAssessment};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{AlligatorConfig, ConfigError, DecisionConfig, RegimeModel};
use crate::domain::TradeDirection;
use crate::regime::{RegimeLines, RegimeResult, RegimeState};

/// The typed form of an incoming signal. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalCandidate {
    pub instrument: String,
    pub timeframe: String,
    pub direction: TradeDirection,
    /// Signal strength in [0, 1].
    pub strength: f64,
    /// Signal family name, e.g. `mfi_signals`.
    pub signal_group: String,
    /// Number of confirming sub-signals.
    pub valid_signals: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Trade,
    Skip,
    Wait,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "TRADE",
            Self::Skip => "SKIP",
            Self::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: String,
    pub regime: RegimeResult,
    pub signal: SignalCandidate,
    /// Present once the quality gate was reached (WAIT and TRADE).
    pub quality: Option<QualityAssessment>,
    pub entry_price: Option<f64>,
    pub next_steps: Vec<String>,
}

impl Decision {
    pub fn is_trade(&self) -> bool {
        self.action == Action::Trade
    }
}

/// Strength value formatted the way the regime model reports it.
fn format_level(regime: &RegimeResult, value: f64) -> String {
    match regime.model {
        RegimeModel::Alligator => format!("{value:.4}"),
        RegimeModel::TrendStrength => format!("{value:.1}"),
    }
}

/// What to watch for while the regime blocks trading.
fn regime_watch_step(regime: &RegimeResult) -> String {
    let label = regime.strength_label();
    let threshold = format_level(regime, regime.threshold);
    match regime.state {
        RegimeState::Sated => {
            format!("Lines converging - wait for {label} to widen again above {threshold}")
        }
        RegimeState::Unknown if regime.lines == RegimeLines::Empty => {
            "Collect more bars - not enough history to classify".to_string()
        }
        RegimeState::Unknown if regime.strength >= regime.threshold => format!(
            "Wait for lines to order - {label} already at {}",
            format_level(regime, regime.strength)
        ),
        _ => format!("Monitor {label} - needs to reach {threshold}"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Decide on `signal`; a missing regime is treated as UNKNOWN.
    pub fn decide(&self, signal: &SignalCandidate, regime: Option<&RegimeResult>) -> Decision {
        debug!(
            instrument = signal.instrument.as_str(),
            timeframe = signal.timeframe.as_str(),
            "analyzing signal"
        );

        let regime = regime.cloned().unwrap_or_else(|| {
            RegimeResult::unknown(RegimeModel::Alligator, AlligatorConfig::default().sleep_threshold)
        });
        let decision = self.evaluate(signal, regime);

        info!(
            instrument = signal.instrument.as_str(),
            action = decision.action.as_str(),
            reason = decision.reason.as_str(),
            "decision"
        );
        decision
    }

    fn evaluate(&self, signal: &SignalCandidate, regime: RegimeResult) -> Decision {
        let direction = signal.direction;

        if !regime.tradeable {
            return Decision {
                action: Action::Skip,
                reason: format!("Market is {} ({})", regime.label(), regime.strength_summary()),
                next_steps: vec![
                    "Wait for trend to develop".to_string(),
                    regime_watch_step(&regime),
                    "Check again in next timeframe bar".to_string(),
                ],
                regime,
                signal: signal.clone(),
                quality: None,
                entry_price: None,
            };
        }

        let trend = regime.direction;
        if direction.is_known() && trend.is_known() && !direction.agrees_with(trend) {
            return Decision {
                action: Action::Skip,
                reason: format!("Signal direction ({direction}) conflicts with trend ({trend})"),
                next_steps: vec![
                    "Do not trade against the trend".to_string(),
                    format!("Wait for {trend} signal instead"),
                    "Check counter-trend opportunities in lower TF only".to_string(),
                ],
                regime,
                signal: signal.clone(),
                quality: None,
                entry_price: None,
            };
        }

        let quality = assess_quality(signal, &self.config.weights);
        let threshold = self.config.quality_threshold;
        if quality.score < threshold {
            return Decision {
                action: Action::Wait,
                reason: format!("Signal quality below threshold ({:.2})", quality.score),
                next_steps: vec![
                    "Wait for stronger confirmation".to_string(),
                    "Monitor for additional signals".to_string(),
                    format!("Target quality score >= {threshold:.2}"),
                ],
                regime,
                signal: signal.clone(),
                quality: Some(quality),
                entry_price: None,
            };
        }

        let entry = signal
            .entry_price
            .map_or_else(|| "Market".to_string(), |p| p.to_string());
        Decision {
            action: Action::Trade,
            reason: format!(
                "TRENDING market ({}) with aligned {direction} signal",
                regime.label()
            ),
            next_steps: vec![
                format!("EXECUTE {direction} on {} {}", signal.instrument, signal.timeframe),
                format!("Entry: {entry}"),
                format!(
                    "{}: {} | Trend strength: {:.2}%",
                    regime.strength_label(),
                    format_level(&regime, regime.strength),
                    regime.trend_strength
                ),
                "Set stop loss at swing low/high".to_string(),
                "Target: 1.5-2x risk-reward ratio".to_string(),
            ],
            regime,
            signal: signal.clone(),
            quality: Some(quality),
            entry_price: signal.entry_price,
        }
    }

    /// Decide every signal against its own regime; keep TRADEs, strongest first.
    pub fn decide_batch(
        &self,
        signals: &[SignalCandidate],
        regimes: &HashMap<SignalKey, RegimeResult>,
    ) -> Vec<Decision> {
        let decisions = signals
            .iter()
            .map(|signal| self.decide(signal, regimes.get(&signal_key(signal))))
            .collect();
        rank_trades(decisions)
    }
}

/// Decide with the default decision configuration.
pub fn decide(signal: &SignalCandidate, regime: Option<&RegimeResult>) -> Decision {
    DecisionEngine::default().decide(signal, regime)
}

/// Batch-decide with the default decision configuration.
pub fn decide_batch(
    signals: &[SignalCandidate],
    regimes: &HashMap<SignalKey, RegimeResult>,
) -> Vec<Decision> {
    DecisionEngine::default().decide_batch(signals, regimes)
}
