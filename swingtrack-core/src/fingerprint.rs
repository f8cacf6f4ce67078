//! Evaluation fingerprinting: deterministic identification of decisions.
//!
//! - `ConfigHash`: identity of the thresholds an evaluator ran with.
//! - `EvaluationRecord`: input, `as_of` date, config hash and decision, the
//!   unit written to audit history.
//! - `EvaluationRecord::fingerprint()`: BLAKE3 of the record's canonical JSON.
//!   Equal fingerprints mean the same question got the same answer.

use crate::config::EvaluatorConfig;
use crate::domain::{PositionDecision, PositionEvaluationInput};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn of(config: &EvaluatorConfig) -> Result<Self, serde_json::Error> {
        Ok(Self(hash_json(config)?))
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hex-encoded BLAKE3 digest of a full evaluation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionFingerprint(pub String);

impl fmt::Display for DecisionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything needed to reproduce one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub as_of: NaiveDate,
    pub config_hash: ConfigHash,
    pub input: PositionEvaluationInput,
    pub decision: PositionDecision,
}

impl EvaluationRecord {
    pub fn new(
        as_of: NaiveDate,
        config: &EvaluatorConfig,
        input: PositionEvaluationInput,
        decision: PositionDecision,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            as_of,
            config_hash: ConfigHash::of(config)?,
            input,
            decision,
        })
    }

    /// Struct fields serialize in declaration order, so the JSON is canonical.
    pub fn fingerprint(&self) -> Result<DecisionFingerprint, serde_json::Error> {
        Ok(DecisionFingerprint(hash_json(self)?))
    }
}

fn hash_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}
