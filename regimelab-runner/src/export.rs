//! Decision artifacts: JSON, CSV, and flat JSONL records.
//!
//! - **JSON**: full evaluations, pretty-printed
//! - **CSV**: one row per decision for spreadsheets
//! - **JSONL**: one flattened record per line for log shippers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regimelab_core::decision::Decision;
use regimelab_core::record::ToRecord;

use crate::pipeline::Evaluation;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(evaluations: &[Evaluation]) -> Result<String> {
    serde_json::to_string_pretty(evaluations).context("failed to serialize evaluations to JSON")
}

pub fn import_json(json: &str) -> Result<Vec<Evaluation>> {
    serde_json::from_str(json).context("failed to deserialize evaluations from JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: instrument, timeframe, action, regime, trend, strength,
/// direction, quality, entry_price, reason
pub fn export_decisions_csv(decisions: &[Decision]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "instrument",
        "timeframe",
        "action",
        "regime",
        "trend",
        "strength",
        "direction",
        "quality",
        "entry_price",
        "reason",
    ])?;

    for d in decisions {
        let quality = d.quality.as_ref().map(|q| format!("{:.2}", q.score)).unwrap_or_default();
        let entry = d.entry_price.map(|p| format!("{p:.6}")).unwrap_or_default();
        let strength = format!("{:.4}", d.regime.strength);
        wtr.write_record([
            d.signal.instrument.as_str(),
            d.signal.timeframe.as_str(),
            d.action.as_str(),
            d.regime.label(),
            d.regime.direction.as_str(),
            strength.as_str(),
            d.signal.direction.as_str(),
            quality.as_str(),
            entry.as_str(),
            d.reason.as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSONL export ───────────────────────────────────────────────────

/// One flat record per line.
pub fn export_records_jsonl<T: ToRecord>(items: &[T]) -> Result<String> {
    let mut out = String::new();
    for item in items {
        let line = serde_json::to_string(&item.to_record()).context("failed to serialize record")?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save a batch's artifacts under `output_dir/{fingerprint prefix}/`:
/// - `evaluations.json`: full evaluations
/// - `decisions.csv`: every decision
/// - `decisions.jsonl`: flattened decision records
///
/// Returns the directory written.
pub fn save_artifacts(output_dir: &Path, fingerprint: &str, evaluations: &[Evaluation]) -> Result<PathBuf> {
    let prefix: String = fingerprint.chars().take(12).collect();
    let name = if prefix.is_empty() { "unfingerprinted".to_string() } else { prefix };
    let run_dir = output_dir.join(name);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    let decisions: Vec<Decision> = evaluations.iter().map(|e| e.decision.clone()).collect();

    std::fs::write(run_dir.join("evaluations.json"), export_json(evaluations)?)?;
    std::fs::write(run_dir.join("decisions.csv"), export_decisions_csv(&decisions)?)?;
    std::fs::write(run_dir.join("decisions.jsonl"), export_records_jsonl(&decisions)?)?;

    Ok(run_dir)
}
