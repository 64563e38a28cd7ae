//! Indicator rows: named numeric/categorical fields for one completed bar.
//!
//! Absence is the "no signal" state: a key that is not present, a NaN number,
//! and an empty string are all treated as missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single indicator field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// NaN numbers and empty text carry no information.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Number(v) => v.is_nan(),
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Present and neither zero nor empty.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Number(v) => !v.is_nan() && *v != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Indicator values for one bar, keyed by field name.
///
/// Backed by a `BTreeMap` so iteration order (and anything derived from it)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorRow {
    fields: BTreeMap<String, FieldValue>,
}

impl IndicatorRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Raw field lookup; `None` when the key is absent or the value is missing.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_missing())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Present, non-zero and non-empty.
    pub fn is_active(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(FieldValue::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for IndicatorRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_read_as_absent() {
        let row = IndicatorRow::new()
            .with("mfi", f64::NAN)
            .with("zcol", "")
            .with("ao", 0.0);
        assert_eq!(row.get("mfi"), None);
        assert_eq!(row.text("zcol"), None);
        assert_eq!(row.get("absent"), None);
        // zero is present but not active
        assert_eq!(row.number("ao"), Some(0.0));
        assert!(!row.is_active("ao"));
    }

    #[test]
    fn active_fields() {
        let row = IndicatorRow::new().with("fdbb", 1.0).with("zcol", "green");
        assert!(row.is_active("fdbb"));
        assert!(row.is_active("zcol"));
        assert_eq!(row.text("zcol"), Some("green"));
        assert_eq!(row.number("zcol"), None);
    }

    #[test]
    fn untagged_json_roundtrip() {
        let row = IndicatorRow::new().with("Close", 1.085).with("zcol", "red");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Close":1.085,"zcol":"red"}"#);
        let back: IndicatorRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn collects_from_pairs() {
        let row: IndicatorRow = vec![("mfi", 1.0), ("mfi_sq", 2.0)].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
    }
}
