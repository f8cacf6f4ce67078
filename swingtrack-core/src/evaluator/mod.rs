//! Position evaluator: the priority-ordered decision chain.
//!
//! Each call is stateless and deterministic: the same input and the same
//! `today` always produce the same `PositionDecision`. The evaluator holds
//! only its thresholds; it is built from config and passed explicitly.
//!
//! Pipeline per call:
//! 1. Validate the input (no `NaN`-bearing decisions)
//! 2. Resolve the trailing stop
//! 3. Compute risk metrics
//! 4. Walk `Rule::CHAIN`; the first match short-circuits, otherwise `Hold`

pub mod rules;

pub use rules::{Rule, RuleContext};

use crate::config::EvaluatorConfig;
use crate::domain::{PositionDecision, PositionEvaluationInput, PositionStatus};
use crate::error::EvaluationError;
use crate::position_management::resolve_stop;
use crate::risk::RiskMetrics;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PositionEvaluator {
    config: EvaluatorConfig,
}

impl PositionEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one position as of `today`.
    pub fn evaluate(
        &self,
        input: &PositionEvaluationInput,
        today: NaiveDate,
    ) -> Result<PositionDecision, EvaluationError> {
        validate(input)?;

        let entry = &input.entry;
        let current = &input.current;

        let current_stop = resolve_stop(
            input.trailing_policy,
            current.price,
            current.ema20,
            current.ema50,
            entry.initial_stop,
            current.swing_low,
        );
        let metrics = RiskMetrics::compute(entry, current.price, today);

        let ctx = RuleContext {
            input,
            metrics,
            current_stop,
        };

        let verdict = Rule::CHAIN
            .iter()
            .find_map(|rule| rule.check(&ctx, &self.config).map(|v| (rule, v)));

        let (status, rationale) = match verdict {
            Some((rule, (status, rationale))) => {
                debug!(
                    rule = rule.name(),
                    status = status.as_str(),
                    r_multiple = metrics.r_multiple,
                    "rule matched"
                );
                (status, Some(rationale))
            }
            None => (PositionStatus::Hold, None),
        };

        Ok(PositionDecision {
            status,
            rationale,
            current_stop,
            pnl_pct: metrics.pnl_pct,
            r_multiple: metrics.r_multiple,
            days_in_trade: metrics.days_in_trade,
        })
    }
}

/// Reject inputs that would otherwise leak `NaN` or divide by zero.
pub fn validate(input: &PositionEvaluationInput) -> Result<(), EvaluationError> {
    let entry = &input.entry;
    let current = &input.current;

    positive("entry_price", entry.entry_price)?;
    positive("current_price", current.price)?;
    positive("initial_r", entry.initial_r)?;
    finite("initial_stop", entry.initial_stop)?;
    finite("ema20", current.ema20)?;
    finite("ema50", current.ema50)?;
    finite("relative_volume", current.relative_volume)?;
    if current.relative_volume < 0.0 {
        return Err(EvaluationError::invalid(
            "relative_volume",
            format!("must not be negative, got {}", current.relative_volume),
        ));
    }
    if !(0.0..=100.0).contains(&current.rsi14) {
        return Err(EvaluationError::invalid(
            "rsi14",
            format!("must be within [0, 100], got {}", current.rsi14),
        ));
    }
    if let Some(low) = current.swing_low {
        finite("swing_low", low)?;
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), EvaluationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EvaluationError::invalid(
            field,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), EvaluationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EvaluationError::invalid(
            field,
            format!("must be finite, got {value}"),
        ))
    }
}
