//! Trade and trend direction enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a candidate trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
    #[default]
    None,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::None => "NONE",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// True when this trade direction points the same way as `trend`.
    pub fn agrees_with(&self, trend: TrendDirection) -> bool {
        matches!(
            (self, trend),
            (Self::Long, TrendDirection::Up) | (Self::Short, TrendDirection::Down)
        )
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the prevailing trend as seen by a regime detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Unknown,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_table() {
        assert!(TradeDirection::Long.agrees_with(TrendDirection::Up));
        assert!(TradeDirection::Short.agrees_with(TrendDirection::Down));
        assert!(!TradeDirection::Long.agrees_with(TrendDirection::Down));
        assert!(!TradeDirection::Short.agrees_with(TrendDirection::Up));
        assert!(!TradeDirection::None.agrees_with(TrendDirection::Up));
        assert!(!TradeDirection::Long.agrees_with(TrendDirection::Unknown));
    }

    #[test]
    fn labels_are_upper_case() {
        assert_eq!(serde_json::to_string(&TradeDirection::Long).unwrap(), "\"LONG\"");
        assert_eq!(serde_json::to_string(&TrendDirection::Unknown).unwrap(), "\"UNKNOWN\"");
        assert_eq!(TradeDirection::Short.to_string(), "SHORT");
    }
}
