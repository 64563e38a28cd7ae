//! RegimeLab Core: regime detection, signal scoring and trade decisions.
//!
//! This crate contains the pure decision pipeline:
//! - Domain types (price bars, indicator rows, directions)
//! - Indicators (SMMA, exponential smoothing, directional movement)
//! - Regime detectors (Alligator line state, directional trend strength)
//! - Multi-factor signal scorer with a capped, reproducible breakdown
//! - Decision engine emitting TRADE / SKIP / WAIT with next steps
//! - Validated, fingerprinted configuration and flat-record serialization
//!
//! Everything here is synchronous and free of shared state: the same inputs
//! and configuration always produce the same outputs.

pub mod config;
pub mod decision;
pub mod domain;
pub mod indicators;
pub mod record;
pub mod regime;
pub mod scoring;

pub use config::{ConfigError, PipelineConfig, RegimeModel};
pub use decision::{decide, decide_batch, Action, Decision, DecisionEngine, SignalCandidate, SignalKey};
pub use domain::{FieldValue, IndicatorRow, PriceBar, TradeDirection, TrendDirection};
pub use record::{Record, ToRecord};
pub use regime::{
    create_detector, detect_alligator_state, detect_trend_strength, to_legacy, RegimeDetector, RegimeResult,
    RegimeState,
};
pub use scoring::{score_signal, ScoreBreakdown, ScoredSignal, SignalScorer};
