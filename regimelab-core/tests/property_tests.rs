//! Property tests for detector, scorer and decision invariants.
//!
//! Uses proptest to verify:
//! 1. SMMA seed: the first defined value is the simple mean of the window
//! 2. Spread: never negative; below the sleep threshold always SLEEPING
//! 3. Short history: both detectors return UNKNOWN, untradeable
//! 4. Breakdown: total equals the sum of capped components; accepted weights stay within 100
//! 5. Alignment: never aligned when untradeable
//! 6. Decisions: total over arbitrary inputs; batches TRADE-only and sorted

use std::collections::HashMap;

use proptest::prelude::*;
use regimelab_core::config::{
    AlligatorConfig, RegimeModel, ScorerConfig, TrendStrengthConfig, MAX_SCORE,
};
use regimelab_core::decision::{decide, decide_batch, Action, SignalCandidate, SignalKey};
use regimelab_core::domain::{IndicatorRow, PriceBar, TradeDirection, TrendDirection};
use regimelab_core::indicators::smma;
use regimelab_core::regime::{
    detect_alligator_state, detect_trend_strength, RegimeResult, RegimeState,
};
use regimelab_core::scoring::SignalScorer;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_mids(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(50.0..150.0_f64, min..max)
}

fn to_bars(mids: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    mids.iter()
        .enumerate()
        .map(|(i, &m)| PriceBar::new(base + chrono::Duration::days(i as i64), m + 0.25, m - 0.25, m))
        .collect()
}

fn arb_trade_direction() -> impl Strategy<Value = TradeDirection> {
    prop_oneof![
        Just(TradeDirection::Long),
        Just(TradeDirection::Short),
        Just(TradeDirection::None),
    ]
}

fn arb_trend_direction() -> impl Strategy<Value = TrendDirection> {
    prop_oneof![
        Just(TrendDirection::Up),
        Just(TrendDirection::Down),
        Just(TrendDirection::Unknown),
    ]
}

fn arb_regime() -> impl Strategy<Value = RegimeResult> {
    (arb_trend_direction(), 0.0..80.0_f64, any::<bool>()).prop_map(|(direction, strength, tradeable)| {
        let mut r = RegimeResult::unknown(RegimeModel::TrendStrength, 25.0);
        r.state = if tradeable {
            RegimeState::Trending
        } else {
            RegimeState::Ranging
        };
        r.direction = direction;
        r.strength = strength;
        r.tradeable = tradeable;
        r
    })
}

fn arb_candidate() -> impl Strategy<Value = SignalCandidate> {
    (
        arb_trade_direction(),
        0.0..1.0_f64,
        prop_oneof![Just("mfi"), Just("zone"), Just("")],
        0usize..5,
        prop_oneof![Just("W1"), Just("D1"), Just("H4"), Just("H1"), Just("")],
    )
        .prop_map(|(direction, strength, group, valid, tf)| SignalCandidate {
            instrument: "TEST".into(),
            timeframe: tf.into(),
            direction,
            strength,
            signal_group: group.into(),
            valid_signals: valid,
            entry_price: None,
        })
}

fn arb_row() -> impl Strategy<Value = IndicatorRow> {
    (
        prop::collection::vec(prop_oneof![Just(0.0), Just(1.0), Just(f64::NAN)], 6),
        prop_oneof![Just("green"), Just("red"), Just("")],
        prop::option::of(any::<bool>()),
        90.0..110.0_f64,
    )
        .prop_map(|(momentum, zcol, lines, close)| {
            let names = ["mfi", "mfi_fake", "mfi_sig", "mfi_sq", "mfi_green", "mfi_fade"];
            let mut row: IndicatorRow = names.iter().copied().zip(momentum).collect();
            row.insert("zcol", zcol);
            row.insert("Close", close);
            match lines {
                Some(true) => {
                    row.insert("jaw", 95.0);
                    row.insert("teeth", 96.0);
                    row.insert("lips", 97.0);
                }
                Some(false) => {
                    row.insert("jaw", 105.0);
                    row.insert("teeth", 104.0);
                    row.insert("lips", 103.0);
                }
                None => {}
            }
            row
        })
}

// ── 1. SMMA seed ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn smma_seed_is_simple_mean(values in prop::collection::vec(-1e3..1e3_f64, 1..60), period in 1usize..30) {
        let out = smma(&values, period);
        prop_assert_eq!(out.len(), values.len());
        if values.len() >= period {
            let mean = values[..period].iter().sum::<f64>() / period as f64;
            prop_assert!((out[period - 1] - mean).abs() < 1e-9);
            prop_assert!(out[..period - 1].iter().all(|v| v.is_nan()));
        } else {
            prop_assert!(out.iter().all(|v| v.is_nan()));
        }
    }
}

// ── 2. Spread ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn spread_nonnegative_and_sleeping_below_threshold(
        mids in arb_mids(20, 80),
        threshold in 0.0..0.05_f64,
    ) {
        let config = AlligatorConfig { sleep_threshold: threshold, ..AlligatorConfig::default() };
        let result = detect_alligator_state(&to_bars(&mids), &config).unwrap();
        prop_assert!(result.strength >= 0.0);
        if result.strength < threshold {
            prop_assert_eq!(result.state, RegimeState::Sleeping);
        }
        prop_assert_eq!(result.tradeable, result.state == RegimeState::Eating);
    }
}

// ── 3. Short history ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_are_unknown(mids in arb_mids(0, 20)) {
        let bars = to_bars(&mids);
        let alligator = detect_alligator_state(&bars, &AlligatorConfig::default()).unwrap();
        prop_assert_eq!(alligator.state, RegimeState::Unknown);
        prop_assert!(!alligator.tradeable);

        if bars.len() < 2 {
            let trend = detect_trend_strength(&bars, &TrendStrengthConfig::default()).unwrap();
            prop_assert_eq!(trend.state, RegimeState::Unknown);
            prop_assert!(!trend.tradeable);
        }
    }

    #[test]
    fn trend_strength_is_bounded(mids in arb_mids(2, 80)) {
        let result = detect_trend_strength(&to_bars(&mids), &TrendStrengthConfig::default()).unwrap();
        prop_assert!(result.strength >= 0.0 && result.strength <= 100.0 + 1e-9);
        prop_assert!(result.trend_strength.is_finite() && result.trend_strength >= 0.0);
        prop_assert_eq!(result.tradeable, result.state == RegimeState::Trending);
    }
}

// ── 4. Breakdown ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn breakdown_total_is_sum_of_capped_parts(
        row in arb_row(),
        regime in arb_regime(),
        htf_zone in prop_oneof![Just("green"), Just("red")],
        with_htf in any::<bool>(),
    ) {
        let config = ScorerConfig::default();
        let scorer = SignalScorer::new(config.clone()).unwrap();
        let htf = IndicatorRow::new().with("zcol_htf", htf_zone).with("jaw_htf", 1.0);
        let htf = with_htf.then_some(&htf);

        let signal = scorer.score(&[row], &regime, "TEST", "H1", htf);
        let b = &signal.breakdown;

        prop_assert!(b.mfi_score <= config.momentum_cap);
        prop_assert!(b.zone_score <= config.zone_weight);
        prop_assert!(b.alligator_score <= config.alligator_weight);
        prop_assert!(b.strength_bonus <= config.strength_bonus);
        prop_assert!(b.htf_bonus <= config.htf_bonus);
        prop_assert_eq!(b.total, b.component_sum());
        prop_assert!(b.total <= config.max_total());
        prop_assert_eq!(signal.score, b.total);
    }
}

proptest! {
    #[test]
    fn accepted_scorer_weights_keep_total_within_hundred(
        row in arb_row(),
        regime in arb_regime(),
        weights in prop::collection::vec(prop_oneof![0u32..60, Just(u32::MAX)], 5),
    ) {
        let config = ScorerConfig {
            momentum_cap: weights[0],
            zone_weight: weights[1],
            alligator_weight: weights[2],
            strength_bonus: weights[3],
            good_bonus: weights[3] / 2,
            htf_bonus: weights[4],
            ..ScorerConfig::default()
        };
        match SignalScorer::new(config) {
            Ok(scorer) => {
                let htf = IndicatorRow::new().with("zcol_htf", "green").with("jaw_htf", 1.0);
                let signal = scorer.score(&[row], &regime, "TEST", "H1", Some(&htf));
                prop_assert!(signal.score <= MAX_SCORE);
            }
            Err(err) => prop_assert!(err.to_string().contains("scorer")),
        }
    }
}

// ── 5. Alignment ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn never_aligned_when_untradeable(regime in arb_regime(), direction in arb_trade_direction()) {
        if !regime.tradeable {
            prop_assert!(!regime.is_aligned(direction));
        }
        if regime.is_aligned(direction) {
            prop_assert!(direction.agrees_with(regime.direction));
        }
    }
}

// ── 6. Decisions ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn decide_is_total(signal in arb_candidate(), regime in prop::option::of(arb_regime())) {
        let decision = decide(&signal, regime.as_ref());
        prop_assert!(matches!(decision.action, Action::Trade | Action::Skip | Action::Wait));
        prop_assert!(!decision.reason.is_empty());
        prop_assert!(!decision.next_steps.is_empty());
        if !decision.regime.tradeable {
            prop_assert_eq!(decision.action, Action::Skip);
        }
    }

    #[test]
    fn batch_is_trade_only_and_sorted(
        entries in prop::collection::vec((arb_candidate(), arb_regime()), 0..12),
    ) {
        let mut signals = Vec::new();
        let mut regimes: HashMap<SignalKey, RegimeResult> = HashMap::new();
        for (i, (mut signal, regime)) in entries.into_iter().enumerate() {
            signal.instrument = format!("SYM{i}");
            regimes.insert((signal.instrument.clone(), signal.timeframe.clone()), regime);
            signals.push(signal);
        }

        let ranked = decide_batch(&signals, &regimes);
        prop_assert!(ranked.iter().all(|d| d.action == Action::Trade));
        prop_assert!(ranked.windows(2).all(|w| w[0].regime.strength >= w[1].regime.strength));
    }
}
