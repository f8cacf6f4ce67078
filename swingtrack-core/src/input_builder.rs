//! Input builder: maps raw records and market data onto the evaluator input.
//!
//! Field mapping and defaults only. Every decision lives in the evaluator.

use crate::config::IndicatorConfig;
use crate::domain::{
    Candle, CurrentSnapshot, EntrySnapshot, PositionEvaluationInput, TrailingPolicy,
};
use crate::error::EvaluationError;
use crate::indicators::IndicatorSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Relative volume assumed when none could be derived.
pub const DEFAULT_RELATIVE_VOLUME: f64 = 1.0;

/// A tracked position as a persistence layer stores it. Any field may be
/// absent; `to_entry_snapshot` decides which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionRecord {
    pub symbol: Option<String>,
    pub entry_price: Option<f64>,
    pub initial_stop: Option<f64>,
    pub initial_target: Option<f64>,
    pub initial_r: Option<f64>,
    pub entry_date: Option<NaiveDate>,
    pub entry_ema20: Option<f64>,
    pub entry_ema50: Option<f64>,
    pub entry_rsi14: Option<f64>,
    pub entry_setup: Option<String>,
    pub trailing_policy: Option<String>,
}

impl PositionRecord {
    /// Entry price, initial stop and initial R are required. `initial_r` is
    /// the risk fixed at entry and is never recomputed here.
    pub fn to_entry_snapshot(&self) -> Result<EntrySnapshot, EvaluationError> {
        let entry_price = self
            .entry_price
            .ok_or_else(|| EvaluationError::missing("entry_price"))?;
        let initial_stop = self
            .initial_stop
            .ok_or_else(|| EvaluationError::missing("initial_stop"))?;
        let initial_r = self
            .initial_r
            .ok_or_else(|| EvaluationError::missing("initial_r"))?;

        Ok(EntrySnapshot {
            entry_price,
            initial_stop,
            initial_target: self.initial_target,
            initial_r,
            entry_date: self.entry_date,
            entry_ema20: self.entry_ema20,
            entry_ema50: self.entry_ema50,
            entry_rsi14: self.entry_rsi14,
            entry_setup: self.entry_setup.clone(),
        })
    }

    /// Stored policy name, or `Ema20` when none is stored.
    pub fn policy(&self) -> TrailingPolicy {
        self.trailing_policy
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Assemble an evaluation input from a record, the latest candle and the
/// indicator snapshot derived from the same history.
pub fn build_input(
    record: &PositionRecord,
    latest: &Candle,
    snapshot: &IndicatorSnapshot,
) -> Result<PositionEvaluationInput, EvaluationError> {
    if latest.date != snapshot.date {
        return Err(EvaluationError::invalid(
            "latest_candle",
            format!(
                "dated {} but indicator snapshot is dated {}",
                latest.date, snapshot.date
            ),
        ));
    }

    Ok(PositionEvaluationInput {
        entry: record.to_entry_snapshot()?,
        current: CurrentSnapshot {
            price: latest.close,
            ema20: snapshot.ema20,
            ema50: snapshot.ema50,
            rsi14: snapshot.rsi14,
            relative_volume: snapshot.relative_volume.unwrap_or(DEFAULT_RELATIVE_VOLUME),
            swing_low: snapshot.higher_low.map(|p| p.price),
        },
        trailing_policy: record.policy(),
    })
}

/// Derive the snapshot from `candles` and build the input in one step.
pub fn build_from_candles(
    record: &PositionRecord,
    candles: &[Candle],
    config: &IndicatorConfig,
) -> Result<PositionEvaluationInput, EvaluationError> {
    let snapshot = IndicatorSnapshot::derive(candles, config)?;
    let latest = candles
        .last()
        .ok_or_else(|| EvaluationError::missing("latest_candle"))?;
    build_input(record, latest, &snapshot)
}
