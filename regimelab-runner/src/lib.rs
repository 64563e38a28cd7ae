//! RegimeLab Runner: pipeline wiring, batch evaluation, artifacts.
//!
//! This crate builds on `regimelab-core` to provide:
//! - A `Pipeline` that builds one detector, scorer and decision engine from a config
//! - Per-market evaluation of price bars plus indicator rows
//! - Parallel batch evaluation with ranking of TRADE decisions
//! - JSON / CSV / JSONL export of evaluations and decisions

pub mod batch;
pub mod export;
pub mod pipeline;

pub use batch::{BatchEvaluator, BatchSummary};
pub use export::{export_decisions_csv, export_json, export_records_jsonl, save_artifacts};
pub use pipeline::{load_config, Evaluation, MarketSnapshot, Pipeline, RunError};
