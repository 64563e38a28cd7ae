//! Flat key-value records for logging and reporting.
//!
//! Nested objects are flattened with dotted keys (`breakdown.total`,
//! `regime.state`); arrays stay arrays. Every serialized field lands under
//! exactly one key.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::decision::Decision;
use crate::regime::{LegacyRegimeRecord, RegimeResult};
use crate::scoring::ScoredSignal;

pub type Record = BTreeMap<String, Value>;

pub trait ToRecord {
    fn to_record(&self) -> Record;
}

/// Flatten any JSON value. Non-object roots are stored under `value`.
pub fn flatten(value: &Value) -> Record {
    let mut out = Record::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(key, child, &mut out);
            }
        }
        other => {
            out.insert("value".to_string(), other.clone());
        }
    }
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Record) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(&format!("{prefix}.{key}"), child, out);
            }
        }
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

fn record_of<T: Serialize>(value: &T) -> Record {
    serde_json::to_value(value)
        .map(|v| flatten(&v))
        .unwrap_or_default()
}

impl ToRecord for RegimeResult {
    fn to_record(&self) -> Record {
        let mut record = record_of(self);
        record.insert("regime".to_string(), Value::from(self.label()));
        record
    }
}

impl ToRecord for ScoredSignal {
    fn to_record(&self) -> Record {
        record_of(self)
    }
}

impl ToRecord for Decision {
    fn to_record(&self) -> Record {
        record_of(self)
    }
}

impl ToRecord for LegacyRegimeRecord {
    fn to_record(&self) -> Record {
        record_of(self)
    }
}
