//! Integration tests for the evaluator.
//!
//! Tests:
//! 1. Reference scenarios A–F: one position per rule outcome.
//! 2. Priority contracts where several rules match at once.
//! 3. End-to-end: candles → snapshot → input → decision.
//! 4. Wire format of decisions.

use chrono::{Duration, NaiveDate};
use swingtrack_core::domain::{
    Candle, CurrentSnapshot, EntrySnapshot, PositionDecision, PositionEvaluationInput,
    PositionStatus, Rationale, TrailingPolicy,
};
use swingtrack_core::input_builder::{build_from_candles, PositionRecord};
use swingtrack_core::{EngineConfig, PositionEvaluator};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()
}

fn days_ago(days: i64) -> Option<NaiveDate> {
    Some(today() - Duration::days(days))
}

/// Entry at 100 with a 95 stop (1R = 5), opened `held` days ago.
fn position(price: f64, ema20: f64, rsi14: f64, held: i64) -> PositionEvaluationInput {
    PositionEvaluationInput {
        entry: EntrySnapshot::open(100.0, 95.0, days_ago(held)),
        current: CurrentSnapshot {
            price,
            ema20,
            ema50: ema20 - 3.0,
            rsi14,
            relative_volume: 1.0,
            swing_low: None,
        },
        trailing_policy: TrailingPolicy::Ema20,
    }
}

fn evaluate(input: &PositionEvaluationInput) -> PositionDecision {
    PositionEvaluator::default()
        .evaluate(input, today())
        .expect("valid input")
}

fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            date: start + Duration::days(i as i64),
            open: close - 0.2,
            high: close + 0.8,
            low: close - 0.8,
            close,
            volume: 2_000_000,
        })
        .collect()
}

// ──────────────────────────────────────────────
// 1. Reference scenarios
// ──────────────────────────────────────────────

#[test]
fn scenario_a_stop_hit() {
    let d = evaluate(&position(94.0, 96.0, 40.0, 3));
    assert_eq!(d.status, PositionStatus::StopHit);
    assert_eq!(d.current_stop, 95.0);
    assert_eq!(d.rationale, Some(Rationale::StopHit { stop: 95.0 }));
    assert_eq!(d.pnl_pct, -6.0);
    assert_eq!(d.r_multiple, -1.2);
}

#[test]
fn scenario_b_momentum_break() {
    let d = evaluate(&position(104.0, 105.0, 55.0, 3));
    assert_eq!(d.status, PositionStatus::Exit);
    assert_eq!(d.current_stop, 95.0);
    assert_eq!(
        d.rationale,
        Some(Rationale::MomentumBroken {
            price: 104.0,
            ema20: 105.0
        })
    );
}

#[test]
fn scenario_c_overbought_scale_out() {
    let d = evaluate(&position(112.5, 108.0, 75.0, 10));
    assert_eq!(d.r_multiple, 2.5);
    assert_eq!(d.status, PositionStatus::PartialExit);
    assert_eq!(
        d.rationale,
        Some(Rationale::OverboughtScaleOut {
            rsi14: 75.0,
            r_multiple: 2.5
        })
    );
}

#[test]
fn scenario_d_overbought_without_profit() {
    let d = evaluate(&position(101.5, 100.0, 75.0, 10));
    assert_eq!(d.r_multiple, 0.3);
    assert_eq!(d.status, PositionStatus::Exit);
    assert_eq!(
        d.rationale,
        Some(Rationale::OverboughtExit {
            rsi14: 75.0,
            r_multiple: 0.3
        })
    );
}

#[test]
fn scenario_e_time_stop() {
    let d = evaluate(&position(101.0, 100.0, 50.0, 35));
    assert_eq!(d.days_in_trade, 35);
    assert_eq!(d.r_multiple, 0.2);
    assert_eq!(d.status, PositionStatus::Exit);
    assert_eq!(
        d.rationale,
        Some(Rationale::TimeStop {
            days_in_trade: 35,
            r_multiple: 0.2
        })
    );
}

#[test]
fn scenario_f_hold() {
    let d = evaluate(&position(105.0, 103.0, 50.0, 5));
    assert_eq!(d.status, PositionStatus::Hold);
    assert_eq!(d.rationale, None);
    assert_eq!(d.r_multiple, 1.0);
    assert_eq!(d.pnl_pct, 5.0);
    assert_eq!(d.days_in_trade, 5);
    assert_eq!(d.current_stop, 103.0);
}

// ──────────────────────────────────────────────
// 2. Priority contracts
// ──────────────────────────────────────────────

#[test]
fn stop_hit_beats_overbought() {
    let d = evaluate(&position(94.0, 96.0, 85.0, 3));
    assert_eq!(d.status, PositionStatus::StopHit);
}

#[test]
fn momentum_break_beats_distribution() {
    let mut input = position(97.0, 99.0, 45.0, 3);
    input.current.relative_volume = 3.0;
    let d = evaluate(&input);
    assert!(matches!(d.rationale, Some(Rationale::MomentumBroken { .. })));
}

#[test]
fn overbought_beats_tighten() {
    // r = 3.0, 115 > 104 * 1.05: tighten would match, overbought wins.
    let d = evaluate(&position(115.0, 104.0, 72.0, 10));
    assert_eq!(d.status, PositionStatus::PartialExit);
}

#[test]
fn tighten_when_extended_and_not_overbought() {
    let d = evaluate(&position(115.0, 104.0, 65.0, 10));
    assert_eq!(d.status, PositionStatus::TightenStop);
    assert_eq!(
        d.rationale,
        Some(Rationale::TightenStop {
            r_multiple: 3.0,
            suggested_stop: 104.0
        })
    );
}

#[test]
fn distribution_beats_time_stop() {
    // Above ema20, 2.5 % under entry, heavy volume, held past the time stop.
    let mut input = position(97.5, 97.0, 45.0, 40);
    input.current.relative_volume = 2.4;
    let d = evaluate(&input);
    assert_eq!(
        d.rationale,
        Some(Rationale::Distribution {
            relative_volume: 2.4,
            pnl_pct: -2.5
        })
    );
}

#[test]
fn unknown_policy_still_decides() {
    let mut input = position(105.0, 103.0, 50.0, 5);
    input.trailing_policy = TrailingPolicy::Unknown;
    let d = evaluate(&input);
    assert_eq!(d.status, PositionStatus::Hold);
    assert_eq!(d.current_stop, 95.0);
}

#[test]
fn future_entry_date_counts_as_day_zero() {
    let d = evaluate(&position(105.0, 103.0, 50.0, -4));
    assert_eq!(d.days_in_trade, 0);
}

// ──────────────────────────────────────────────
// 3. End-to-end from candles
// ──────────────────────────────────────────────

#[test]
fn candles_to_decision() {
    // Quiet uptrend of 70 sessions.
    let closes: Vec<f64> = (0..70)
        .map(|i| 100.0 + i as f64 * 0.3 + if i % 2 == 0 { 0.6 } else { -0.6 })
        .collect();
    let candles = make_candles(&closes);
    let record = PositionRecord {
        symbol: Some("AAPL".into()),
        entry_price: Some(110.0),
        initial_stop: Some(106.0),
        initial_r: Some(4.0),
        entry_date: Some(candles[60].date),
        ..Default::default()
    };

    let config = EngineConfig::default();
    let input = build_from_candles(&record, &candles, &config.indicators).unwrap();
    assert_eq!(input.current.price, closes[69]);
    assert!((input.current.relative_volume - 1.0).abs() < 1e-9);

    let last = candles.last().unwrap().date;
    let d = PositionEvaluator::new(config.evaluator)
        .evaluate(&input, last)
        .unwrap();
    assert_eq!(d.days_in_trade, 9);
    assert!(d.current_stop >= 106.0);
    assert!(d.pnl_pct.is_finite() && d.r_multiple.is_finite());
}

// ──────────────────────────────────────────────
// 4. Wire format
// ──────────────────────────────────────────────

#[test]
fn decision_json_shape() {
    let d = evaluate(&position(94.0, 96.0, 40.0, 3));
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["status"], "STOP_HIT");
    assert_eq!(json["rationale"]["kind"], "STOP_HIT");
    assert_eq!(json["rationale"]["stop"], 95.0);
    assert_eq!(json["current_stop"], 95.0);

    let hold = evaluate(&position(105.0, 103.0, 50.0, 5));
    let json = serde_json::to_value(&hold).unwrap();
    assert_eq!(json["status"], "HOLD");
    assert!(json["rationale"].is_null());
}

#[test]
fn input_accepts_unrecognized_policy_name() {
    let json = r#"{
        "entry": {"entry_price": 100.0, "initial_stop": 95.0, "initial_target": null,
                  "initial_r": 5.0, "entry_date": null, "entry_ema20": null,
                  "entry_ema50": null, "entry_rsi14": null, "entry_setup": null},
        "current": {"price": 101.0, "ema20": 100.0, "ema50": 98.0,
                    "rsi14": 50.0, "relative_volume": 1.0},
        "trailing_policy": "PARABOLIC"
    }"#;
    let input: PositionEvaluationInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.trailing_policy, TrailingPolicy::Unknown);
    assert!(input.current.swing_low.is_none());
}
