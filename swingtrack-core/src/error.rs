//! Structured error types for the evaluation engine.
//!
//! Every error is local to one evaluation. Batch callers collect them per
//! position instead of aborting.

use thiserror::Error;

/// Failures while deriving indicators from candle history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("insufficient history for {indicator}: need {required} candles, have {available}")]
    InsufficientHistory {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("degenerate data for {indicator}: {reason}")]
    Degenerate { indicator: String, reason: String },
}

impl IndicatorError {
    pub fn insufficient(indicator: impl Into<String>, required: usize, available: usize) -> Self {
        IndicatorError::InsufficientHistory {
            indicator: indicator.into(),
            required,
            available,
        }
    }

    pub fn degenerate(indicator: impl Into<String>, reason: impl Into<String>) -> Self {
        IndicatorError::Degenerate {
            indicator: indicator.into(),
            reason: reason.into(),
        }
    }
}

/// Failures that abort a single position evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl EvaluationError {
    pub fn missing(field: &'static str) -> Self {
        EvaluationError::InvalidInput {
            field,
            reason: "is missing".into(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EvaluationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
