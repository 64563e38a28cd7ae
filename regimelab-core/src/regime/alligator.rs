//! Alligator state detector.
//!
//! Three SMMA lines over bar midpoints, jaw (slow), teeth and lips (fast):
//! - SLEEPING: normalized spread below the sleep threshold (lines intertwined)
//! - EATING: lines fanned out and strictly ordered, spread holding or widening
//! - SATED: lines ordered but the spread has shrunk below `sated_ratio` of its
//!   recent mean (converging after a move)
//! - UNKNOWN: spread present but lines out of order, or not enough data
//!
//! Only EATING is tradeable. Classification reads the unshifted current-bar
//! values; line offsets exist for display only.

use tracing::debug;

use super::{RegimeDetector, RegimeLines, RegimeResult, RegimeState};
use crate::config::{AlligatorConfig, ConfigError, RegimeModel};
use crate::domain::{PriceBar, TrendDirection};
use crate::indicators::{last_value, SmoothedLine};

/// Full jaw/teeth/lips series for a bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AlligatorLines {
    pub jaw: Vec<f64>,
    pub teeth: Vec<f64>,
    pub lips: Vec<f64>,
}

impl AlligatorLines {
    pub fn new(jaw: Vec<f64>, teeth: Vec<f64>, lips: Vec<f64>) -> Self {
        Self { jaw, teeth, lips }
    }

    fn len_matches(&self, n: usize) -> bool {
        self.jaw.len() == n && self.teeth.len() == n && self.lips.len() == n
    }

    /// |lips - jaw| at `i`, `None` if any line is undefined there.
    fn spread_at(&self, i: usize) -> Option<f64> {
        let (jaw, teeth, lips) = (self.jaw[i], self.teeth[i], self.lips[i]);
        if jaw.is_nan() || teeth.is_nan() || lips.is_nan() {
            return None;
        }
        Some((lips - jaw).abs())
    }
}

/// Direction from strict line ordering.
fn line_direction(jaw: f64, teeth: f64, lips: f64) -> TrendDirection {
    if lips > teeth && teeth > jaw {
        TrendDirection::Up
    } else if lips < teeth && teeth < jaw {
        TrendDirection::Down
    } else {
        TrendDirection::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct AlligatorDetector {
    config: AlligatorConfig,
    jaw: SmoothedLine,
    teeth: SmoothedLine,
    lips: SmoothedLine,
}

impl AlligatorDetector {
    pub fn new(config: AlligatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            jaw: SmoothedLine::new("jaw", config.jaw.period, config.jaw.offset),
            teeth: SmoothedLine::new("teeth", config.teeth.period, config.teeth.offset),
            lips: SmoothedLine::new("lips", config.lips.period, config.lips.offset),
            config,
        })
    }

    pub fn config(&self) -> &AlligatorConfig {
        &self.config
    }

    /// Unshifted line series, as used for classification.
    pub fn lines(&self, bars: &[PriceBar]) -> AlligatorLines {
        let mids: Vec<f64> = bars.iter().map(PriceBar::midpoint).collect();
        AlligatorLines {
            jaw: self.jaw.compute_series(&mids),
            teeth: self.teeth.compute_series(&mids),
            lips: self.lips.compute_series(&mids),
        }
    }

    /// Lines shifted forward by their display offsets, for charting.
    pub fn display_lines(&self, bars: &[PriceBar]) -> AlligatorLines {
        let lines = self.lines(bars);
        AlligatorLines {
            jaw: self.jaw.displaced(&lines.jaw),
            teeth: self.teeth.displaced(&lines.teeth),
            lips: self.lips.displaced(&lines.lips),
        }
    }

    /// Spread shrinking against the bars before the latest one in the window.
    fn is_converging(&self, lines: &AlligatorLines, current_spread: f64) -> bool {
        let n = lines.jaw.len();
        let start = n.saturating_sub(self.config.sated_lookback);
        let history: Vec<f64> = (start..n.saturating_sub(1))
            .filter_map(|i| lines.spread_at(i))
            .collect();

        if history.is_empty() {
            return false;
        }

        let mean = history.iter().sum::<f64>() / history.len() as f64;
        current_spread < mean * self.config.sated_ratio
    }

    /// Classify `bars` against line series computed elsewhere, one value per bar.
    ///
    /// Series whose length differs from `bars` yield UNKNOWN.
    pub fn detect_with_lines(&self, bars: &[PriceBar], lines: &AlligatorLines) -> RegimeResult {
        if bars.len() < self.min_bars() {
            debug!(bars = bars.len(), required = self.min_bars(), "alligator: insufficient data");
            return RegimeResult::unknown(RegimeModel::Alligator, self.config.sleep_threshold);
        }
        if !lines.len_matches(bars.len()) {
            debug!(bars = bars.len(), jaw = lines.jaw.len(), "alligator: line length mismatch");
            return RegimeResult::unknown(RegimeModel::Alligator, self.config.sleep_threshold);
        }
        self.classify(lines)
    }

    fn classify(&self, lines: &AlligatorLines) -> RegimeResult {
        let threshold = self.config.sleep_threshold;
        let (jaw, teeth, lips) = match (
            last_value(&lines.jaw),
            last_value(&lines.teeth),
            last_value(&lines.lips),
        ) {
            (Some(j), Some(t), Some(l)) => (j, t, l),
            _ => {
                debug!("alligator: latest line values undefined");
                return RegimeResult::unknown(RegimeModel::Alligator, threshold);
            }
        };

        let spread = jaw.max(teeth).max(lips) - jaw.min(teeth).min(lips);
        let avg = (jaw + teeth + lips) / 3.0;
        let normalized = if avg > 0.0 { spread / avg } else { 0.0 };

        let direction = line_direction(jaw, teeth, lips);
        let state = if normalized < threshold {
            RegimeState::Sleeping
        } else if direction.is_known() {
            if self.is_converging(lines, spread) {
                RegimeState::Sated
            } else {
                RegimeState::Eating
            }
        } else {
            RegimeState::Unknown
        };

        debug!(
            state = state.as_str(),
            direction = direction.as_str(),
            spread = normalized,
            "alligator classified"
        );

        RegimeResult {
            model: RegimeModel::Alligator,
            state,
            direction,
            lines: RegimeLines::Alligator { jaw, teeth, lips },
            strength: normalized,
            threshold,
            trend_strength: 0.0,
            tradeable: state.is_tradeable(),
        }
    }
}

impl RegimeDetector for AlligatorDetector {
    fn name(&self) -> &str {
        "alligator"
    }

    fn model(&self) -> RegimeModel {
        RegimeModel::Alligator
    }

    fn min_bars(&self) -> usize {
        self.config.required_bars()
    }

    fn detect(&self, bars: &[PriceBar]) -> RegimeResult {
        if bars.len() < self.min_bars() {
            debug!(bars = bars.len(), required = self.min_bars(), "alligator: insufficient data");
            return RegimeResult::unknown(RegimeModel::Alligator, self.config.sleep_threshold);
        }
        self.classify(&self.lines(bars))
    }
}
