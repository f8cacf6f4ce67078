//! Day-by-day replay of a tracked position over its candle history.
//!
//! Each session is evaluated with only the candles up to and including that
//! session, so no step sees the future. The stateless evaluator floors its
//! stop at the initial stop on every call; the replay additionally carries a
//! `RatchetState`, which keeps the highest stop seen so far.

use crate::config::EngineConfig;
use crate::domain::{Candle, PositionDecision, PositionStatus};
use crate::error::EvaluationError;
use crate::evaluator::PositionEvaluator;
use crate::indicators::MIN_HISTORY;
use crate::input_builder::{build_from_candles, PositionRecord};
use crate::position_management::RatchetState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub date: NaiveDate,
    pub close: f64,
    pub decision: PositionDecision,
    /// Highest stop applied up to this session.
    pub ratcheted_stop: f64,
    /// Close at or under the ratcheted stop, even if the day's own stop
    /// released back to the initial stop.
    pub below_ratchet: bool,
}

/// Held sessions that came before enough history existed to evaluate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSessions {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// Present when the entry date falls inside the indicator warmup.
    pub skipped: Option<SkippedSessions>,
    pub steps: Vec<ReplayStep>,
}

/// Evaluate `record` on every session from its entry date (or the first
/// session with enough history) until an exit fires or candles run out.
pub fn replay(
    record: &PositionRecord,
    candles: &[Candle],
    config: &EngineConfig,
) -> Result<Replay, EvaluationError> {
    let entry = record.to_entry_snapshot()?;
    let evaluator = PositionEvaluator::new(config.evaluator.clone());
    let mut ratchet = RatchetState::new(entry.initial_stop);
    let mut steps = Vec::new();

    let skipped = entry.entry_date.and_then(|d| held_during_warmup(candles, d));
    if let Some(s) = &skipped {
        warn!(
            first = %s.first,
            last = %s.last,
            count = s.count,
            "held sessions before {MIN_HISTORY} candles of history were not evaluated"
        );
    }

    for end in MIN_HISTORY..=candles.len() {
        let window = &candles[..end];
        let today = &window[end - 1];
        if entry.entry_date.is_some_and(|d| today.date < d) {
            continue;
        }

        let input = build_from_candles(record, window, &config.indicators)?;
        let decision = evaluator.evaluate(&input, today.date)?;
        let ratcheted_stop = ratchet.apply(decision.current_stop);
        let terminal = matches!(
            decision.status,
            PositionStatus::Exit | PositionStatus::StopHit
        );

        debug!(
            date = %today.date,
            status = decision.status.as_str(),
            ratcheted_stop,
            "replay step"
        );

        steps.push(ReplayStep {
            date: today.date,
            close: today.close,
            decision,
            ratcheted_stop,
            below_ratchet: today.close <= ratcheted_stop,
        });

        if terminal {
            break;
        }
    }

    Ok(Replay { skipped, steps })
}

fn held_during_warmup(candles: &[Candle], entry_date: NaiveDate) -> Option<SkippedSessions> {
    let warmup = &candles[..candles.len().min(MIN_HISTORY - 1)];
    let held: Vec<NaiveDate> = warmup
        .iter()
        .map(|c| c.date)
        .filter(|&d| d >= entry_date)
        .collect();
    Some(SkippedSessions {
        first: *held.first()?,
        last: *held.last()?,
        count: held.len(),
    })
}
