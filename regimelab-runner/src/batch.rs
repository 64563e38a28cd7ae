//! Batch evaluation over many market snapshots, optionally in parallel.

use rayon::prelude::*;
use tracing::info;

use regimelab_core::decision::{rank_trades, Action, Decision};

use crate::pipeline::{Evaluation, MarketSnapshot, Pipeline};

/// Evaluates snapshots independently and collects results in input order.
pub struct BatchEvaluator {
    pipeline: Pipeline,
    parallel: bool,
}

impl BatchEvaluator {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// One evaluation per snapshot, in input order either way.
    pub fn evaluate_all(&self, snapshots: &[MarketSnapshot]) -> Vec<Evaluation> {
        let evaluations: Vec<Evaluation> = if self.parallel {
            snapshots.par_iter().map(|s| self.pipeline.evaluate(s)).collect()
        } else {
            snapshots.iter().map(|s| self.pipeline.evaluate(s)).collect()
        };

        let summary = BatchSummary::from_evaluations(&evaluations);
        info!(
            evaluated = summary.total,
            trades = summary.trades,
            skips = summary.skips,
            waits = summary.waits,
            parallel = self.parallel,
            "batch evaluated"
        );
        evaluations
    }

    /// TRADE decisions only, strongest regime first, ties in input order.
    pub fn ranked_trades(&self, snapshots: &[MarketSnapshot]) -> Vec<Decision> {
        let decisions = self
            .evaluate_all(snapshots)
            .into_iter()
            .map(|e| e.decision)
            .collect();
        rank_trades(decisions)
    }
}

/// Action counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub trades: usize,
    pub skips: usize,
    pub waits: usize,
}

impl BatchSummary {
    pub fn from_evaluations(evaluations: &[Evaluation]) -> Self {
        let mut summary = Self {
            total: evaluations.len(),
            ..Self::default()
        };
        for e in evaluations {
            match e.decision.action {
                Action::Trade => summary.trades += 1,
                Action::Skip => summary.skips += 1,
                Action::Wait => summary.waits += 1,
            }
        }
        summary
    }
}
