//! Batch evaluation: many positions, one `Result` each.
//!
//! Evaluations are independent, so they run on the rayon pool. A failed item
//! is logged and reported in place; it never aborts the rest of the batch.

use crate::config::EngineConfig;
use crate::domain::{Candle, PositionDecision, PositionEvaluationInput};
use crate::error::EvaluationError;
use crate::evaluator::PositionEvaluator;
use crate::input_builder::{build_from_candles, PositionRecord};
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::warn;

/// A fully built input awaiting evaluation.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: String,
    pub input: PositionEvaluationInput,
}

/// A stored position plus the candle history for its symbol.
#[derive(Debug, Clone)]
pub struct PositionJob {
    pub id: String,
    pub record: PositionRecord,
    pub candles: Vec<Candle>,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub id: String,
    pub result: Result<PositionDecision, EvaluationError>,
}

/// Outcomes in the same order as the submitted items.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn decisions(&self) -> impl Iterator<Item = (&str, &PositionDecision)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|d| (o.id.as_str(), d)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &EvaluationError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.id.as_str(), e)))
    }

    /// Decisions whose status is anything but `Hold`.
    pub fn action_required(&self) -> impl Iterator<Item = (&str, &PositionDecision)> {
        self.decisions().filter(|(_, d)| d.status.requires_action())
    }
}

pub struct BatchEvaluator {
    config: EngineConfig,
    evaluator: PositionEvaluator,
    parallel: bool,
}

impl BatchEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        let evaluator = PositionEvaluator::new(config.evaluator.clone());
        Self {
            config,
            evaluator,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluate prebuilt inputs.
    pub fn evaluate(&self, items: &[BatchItem], today: NaiveDate) -> BatchReport {
        let run = |item: &BatchItem| BatchOutcome {
            id: item.id.clone(),
            result: self.evaluator.evaluate(&item.input, today),
        };
        self.collect(items, run)
    }

    /// Derive indicators, build the input and evaluate, per job.
    pub fn run_jobs(&self, jobs: &[PositionJob], today: NaiveDate) -> BatchReport {
        let run = |job: &PositionJob| BatchOutcome {
            id: job.id.clone(),
            result: build_from_candles(&job.record, &job.candles, &self.config.indicators)
                .and_then(|input| self.evaluator.evaluate(&input, today)),
        };
        self.collect(jobs, run)
    }

    fn collect<T, F>(&self, items: &[T], run: F) -> BatchReport
    where
        T: Sync,
        F: Fn(&T) -> BatchOutcome + Send + Sync,
    {
        let outcomes: Vec<BatchOutcome> = if self.parallel {
            items.par_iter().map(&run).collect()
        } else {
            items.iter().map(&run).collect()
        };

        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!(id = %outcome.id, error = %e, "position evaluation failed");
            }
        }

        BatchReport { outcomes }
    }
}
