//! Active sub-signal extraction and trade-direction resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FieldValue, IndicatorRow, TradeDirection, TrendDirection};

/// Momentum-flow family. `mfi_fade` is reported but never scored.
pub const MOMENTUM_FIELDS: [&str; 6] = ["mfi", "mfi_fake", "mfi_sig", "mfi_sq", "mfi_green", "mfi_fade"];

/// Momentum-flow fields that count toward the momentum score.
pub const SCORED_MOMENTUM_FIELDS: [&str; 5] = ["mfi", "mfi_fake", "mfi_sig", "mfi_sq", "mfi_green"];

pub const ZONE_FIELDS: [&str; 5] = ["zone_sig", "zcol", "zlc", "zlcb", "zlcs"];

pub const OSCILLATOR_FIELDS: [&str; 6] = ["ao", "ac", "aoaz", "aobz", "aocolor", "accolor"];

/// Fractal-breakout family; `fdbb` is bullish, `fdbs` bearish.
pub const BREAKOUT_FIELDS: [&str; 3] = ["fdb", "fdbb", "fdbs"];

pub const ZONE_COLOR: &str = "zcol";
pub const ALLIGATOR_LABEL: &str = "alligator";
pub const CLOSE: &str = "Close";
pub const FRACTAL_LOW: &str = "fl";
pub const FRACTAL_HIGH: &str = "fh";

/// Bar-level Alligator reading from the row's own jaw/teeth/lips columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlligatorLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl AlligatorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "BULLISH" => Some(Self::Bullish),
            "BEARISH" => Some(Self::Bearish),
            "NEUTRAL" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// `None` when any of the three lines or the close is missing.
    pub fn from_row(row: &IndicatorRow) -> Option<Self> {
        let jaw = row.number("jaw")?;
        let teeth = row.number("teeth")?;
        let lips = row.number("lips")?;
        let close = row.number(CLOSE)?;

        if lips > teeth && teeth > jaw && close > lips {
            Some(Self::Bullish)
        } else if lips < teeth && teeth < jaw && close < lips {
            Some(Self::Bearish)
        } else {
            Some(Self::Neutral)
        }
    }

    pub fn supports(&self, direction: TradeDirection) -> bool {
        matches!(
            (self, direction),
            (Self::Bullish, TradeDirection::Long) | (Self::Bearish, TradeDirection::Short)
        )
    }
}

/// Zone color that confirms `direction`.
pub fn zone_color_for(direction: TradeDirection) -> Option<&'static str> {
    match direction {
        TradeDirection::Long => Some("green"),
        TradeDirection::Short => Some("red"),
        TradeDirection::None => None,
    }
}

/// Active sub-signals of one indicator row, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSignals {
    fields: BTreeMap<String, FieldValue>,
}

impl ActiveSignals {
    /// Collect the present, non-zero fields of every known family.
    pub fn extract(row: &IndicatorRow) -> Self {
        let mut fields = BTreeMap::new();

        let families = MOMENTUM_FIELDS
            .iter()
            .chain(ZONE_FIELDS.iter())
            .chain(OSCILLATOR_FIELDS.iter())
            .chain(BREAKOUT_FIELDS.iter());
        for &name in families {
            if let Some(value) = row.get(name).filter(|v| v.is_active()) {
                fields.insert(name.to_string(), value.clone());
            }
        }

        if let Some(label) = AlligatorLabel::from_row(row) {
            fields.insert(ALLIGATOR_LABEL.to_string(), FieldValue::from(label.as_str()));
        }

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_number)
    }

    pub fn zone_color(&self) -> Option<&str> {
        self.fields.get(ZONE_COLOR).and_then(FieldValue::as_text)
    }

    pub fn alligator(&self) -> Option<AlligatorLabel> {
        self.fields
            .get(ALLIGATOR_LABEL)
            .and_then(FieldValue::as_text)
            .and_then(AlligatorLabel::parse)
    }

    pub fn momentum_count(&self) -> usize {
        SCORED_MOMENTUM_FIELDS
            .iter()
            .filter(|name| self.fields.contains_key(**name))
            .count()
    }

    /// Name of the first family with an active field, momentum flow first.
    pub fn signal_group(&self) -> Option<&'static str> {
        let any = |names: &[&str]| names.iter().any(|n| self.fields.contains_key(*n));
        if any(&MOMENTUM_FIELDS[..]) {
            Some("mfi")
        } else if any(&ZONE_FIELDS[..]) {
            Some("zone")
        } else if any(&OSCILLATOR_FIELDS[..]) {
            Some("ao")
        } else if any(&BREAKOUT_FIELDS[..]) {
            Some("fdb")
        } else {
            None
        }
    }

    /// Sub-signals that confirm something; a NEUTRAL Alligator label does not.
    pub fn confirmations(&self) -> usize {
        let neutral = matches!(self.alligator(), Some(AlligatorLabel::Neutral));
        self.fields.len() - usize::from(neutral)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }
}

impl From<BTreeMap<String, FieldValue>> for ActiveSignals {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}

/// Breakout flag, then zone color, then Alligator label, then the regime's
/// trend; LONG when nothing decides.
pub fn resolve_direction(signals: &ActiveSignals, trend: TrendDirection) -> TradeDirection {
    if signals.number("fdbb").is_some_and(|v| v > 0.0) {
        return TradeDirection::Long;
    }
    if signals.number("fdbs").is_some_and(|v| v > 0.0) {
        return TradeDirection::Short;
    }

    match signals.zone_color() {
        Some("green") => return TradeDirection::Long,
        Some("red") => return TradeDirection::Short,
        _ => {}
    }

    match signals.alligator() {
        Some(AlligatorLabel::Bullish) => return TradeDirection::Long,
        Some(AlligatorLabel::Bearish) => return TradeDirection::Short,
        _ => {}
    }

    match trend {
        TrendDirection::Up => TradeDirection::Long,
        TrendDirection::Down => TradeDirection::Short,
        TrendDirection::Unknown => TradeDirection::Long,
    }
}
