//! Trend regime from moving-average relationships.
//!
//! Evaluation uses the two-way split (`classify`). Screening uses the
//! three-way variant, which carves out `Consolidation` when price hugs the
//! 20 EMA.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Uptrend,
    Downtrend,
    Consolidation,
}

/// `Uptrend` iff ema20 > ema50, otherwise `Downtrend`.
pub fn classify(ema20: f64, ema50: f64) -> Regime {
    if ema20 > ema50 {
        Regime::Uptrend
    } else {
        Regime::Downtrend
    }
}

/// Three-way classification: `Consolidation` when price lies within
/// `band_pct` percent of ema20, otherwise the two-way result.
pub fn classify_with_consolidation(price: f64, ema20: f64, ema50: f64, band_pct: f64) -> Regime {
    if ema20 > 0.0 && ((price - ema20).abs() / ema20) * 100.0 <= band_pct {
        Regime::Consolidation
    } else {
        classify(ema20, ema50)
    }
}
