//! Position snapshots: the evaluator's input contract.
//!
//! - `EntrySnapshot`: fixed risk baseline recorded when a position is opened.
//! - `CurrentSnapshot`: fresh market state for a single evaluation.
//! - `PositionEvaluationInput`: both snapshots plus the trailing policy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk baseline captured once at entry. Never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub entry_price: f64,
    pub initial_stop: f64,
    pub initial_target: Option<f64>,
    /// Risk per share at entry: `|entry_price - initial_stop|`.
    pub initial_r: f64,
    pub entry_date: Option<NaiveDate>,
    pub entry_ema20: Option<f64>,
    pub entry_ema50: Option<f64>,
    pub entry_rsi14: Option<f64>,
    pub entry_setup: Option<String>,
}

impl EntrySnapshot {
    /// Open a new baseline. `initial_r` is derived from entry and stop here
    /// and nowhere else.
    ///
    /// # Example
    /// ```
    /// use swingtrack_core::domain::EntrySnapshot;
    ///
    /// let entry = EntrySnapshot::open(100.0, 95.0, None);
    /// assert_eq!(entry.initial_r, 5.0);
    /// ```
    pub fn open(entry_price: f64, initial_stop: f64, entry_date: Option<NaiveDate>) -> Self {
        Self {
            entry_price,
            initial_stop,
            initial_target: None,
            initial_r: (entry_price - initial_stop).abs(),
            entry_date,
            entry_ema20: None,
            entry_ema50: None,
            entry_rsi14: None,
            entry_setup: None,
        }
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.initial_target = Some(target);
        self
    }

    /// Record the indicator readings seen at entry.
    pub fn with_entry_indicators(mut self, ema20: f64, ema50: f64, rsi14: f64) -> Self {
        self.entry_ema20 = Some(ema20);
        self.entry_ema50 = Some(ema50);
        self.entry_rsi14 = Some(rsi14);
        self
    }

    pub fn with_setup(mut self, setup: impl Into<String>) -> Self {
        self.entry_setup = Some(setup.into());
        self
    }
}

/// Market state at evaluation time. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub price: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub rsi14: f64,
    pub relative_volume: f64,
    /// Most recent confirmed higher swing low, if one was detected.
    #[serde(default)]
    pub swing_low: Option<f64>,
}

/// How the protective stop trails the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailingPolicy {
    /// Trail under the 20-period EMA.
    #[default]
    Ema20,
    /// Trail under the latest higher swing low.
    HigherLow,
    /// Any policy name this engine does not recognise. The stop stays at the
    /// initial stop.
    #[serde(other)]
    Unknown,
}

impl TrailingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrailingPolicy::Ema20 => "EMA20",
            TrailingPolicy::HigherLow => "HIGHER_LOW",
            TrailingPolicy::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TrailingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrailingPolicy {
    type Err = std::convert::Infallible;

    /// Case-insensitive; `-` and `_` are interchangeable. Unrecognised names
    /// map to `Unknown` rather than failing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Ok(match normalized.as_str() {
            "EMA20" | "EMA_20" => TrailingPolicy::Ema20,
            "HIGHER_LOW" => TrailingPolicy::HigherLow,
            _ => TrailingPolicy::Unknown,
        })
    }
}

/// Everything one evaluation needs. Has no identity beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvaluationInput {
    pub entry: EntrySnapshot,
    pub current: CurrentSnapshot,
    #[serde(default)]
    pub trailing_policy: TrailingPolicy,
}
