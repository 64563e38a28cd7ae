//! Signal-quality assessment.

use serde::{Deserialize, Serialize};

use super::SignalCandidate;
use crate::config::{QualityWeights, MAX_SCORE};

/// Quality score in [0, 1] plus the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: f64,
    pub factors: Vec<String>,
}

/// Sum the applicable weights (hundredths), capped at 1.0.
pub fn assess_quality(signal: &SignalCandidate, weights: &QualityWeights) -> QualityAssessment {
    let mut points = 0u32;
    let mut factors = Vec::new();

    let strength = signal.strength;
    if strength > 0.7 {
        points = points.saturating_add(weights.strong);
        factors.push(format!("Strong signal: {strength:.2}"));
    } else if strength > 0.5 {
        points = points.saturating_add(weights.moderate);
        factors.push(format!("Moderate signal: {strength:.2}"));
    } else if strength > 0.3 {
        points = points.saturating_add(weights.weak);
        factors.push(format!("Weak signal: {strength:.2}"));
    }

    if signal.signal_group.to_ascii_lowercase().contains("mfi") {
        points = points.saturating_add(weights.momentum_family);
        factors.push("Momentum-flow signal".to_string());
    }

    if signal.valid_signals >= 2 {
        points = points.saturating_add(weights.confirmation);
        factors.push(format!("Multi-signal confirmation: {}", signal.valid_signals));
    }

    match signal.timeframe.as_str() {
        "W1" | "D1" => {
            points = points.saturating_add(weights.higher_timeframe);
            factors.push(format!("Higher timeframe: {}", signal.timeframe));
        }
        "H4" => {
            points = points.saturating_add(weights.medium_timeframe);
            factors.push(format!("Medium timeframe: {}", signal.timeframe));
        }
        _ => {}
    }

    QualityAssessment {
        score: f64::from(points.min(MAX_SCORE)) / 100.0,
        factors,
    }
}
