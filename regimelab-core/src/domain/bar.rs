//! PriceBar: one completed trading period.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// High/low/close bar for a single instrument and timeframe.
///
/// Produced by the data source and never mutated afterwards. The midpoint
/// may be supplied precomputed; otherwise it is derived as `(high + low) / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midpoint: Option<f64>,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            high,
            low,
            close,
            midpoint: None,
        }
    }

    /// Precomputed midpoint if present, else `(high + low) / 2`.
    pub fn midpoint(&self) -> f64 {
        self.midpoint.unwrap_or((self.high + self.low) / 2.0)
    }
}
