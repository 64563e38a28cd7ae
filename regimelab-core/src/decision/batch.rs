//! Batch ranking of decisions.

use super::{Decision, SignalCandidate};

/// Regime lookup key: (instrument, timeframe).
pub type SignalKey = (String, String);

pub fn signal_key(signal: &SignalCandidate) -> SignalKey {
    (signal.instrument.clone(), signal.timeframe.clone())
}

/// Keep TRADE decisions, strongest regime first.
///
/// The sort is stable, so equal strengths keep their input order.
pub fn rank_trades(decisions: Vec<Decision>) -> Vec<Decision> {
    let mut trades: Vec<Decision> = decisions.into_iter().filter(Decision::is_trade).collect();
    trades.sort_by(|a, b| b.regime.strength.total_cmp(&a.regime.strength));
    trades
}
