//! Risk metrics: P/L percent, R-multiple and days in trade.
//!
//! All values are rounded to 2 decimal places with the same rule, so
//! re-evaluating unchanged inputs reproduces the same decision.

use crate::domain::EntrySnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(current - entry) / entry * 100`, rounded.
pub fn pnl_pct(entry_price: f64, current_price: f64) -> f64 {
    round2((current_price - entry_price) / entry_price * 100.0)
}

/// `(current - entry) / initial_r`, rounded. Zero when `initial_r` is zero.
///
/// # Example
/// ```
/// use swingtrack_core::risk::r_multiple;
///
/// assert_eq!(r_multiple(100.0, 110.0, 5.0), 2.0);
/// assert_eq!(r_multiple(100.0, 100.0, 0.0), 0.0);
/// ```
pub fn r_multiple(entry_price: f64, current_price: f64, initial_r: f64) -> f64 {
    if initial_r == 0.0 {
        return 0.0;
    }
    round2((current_price - entry_price) / initial_r)
}

/// Whole calendar days from entry to `today`. Zero without an entry date,
/// and never negative.
pub fn days_in_trade(entry_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    entry_date
        .map(|d| (today - d).num_days().max(0))
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or(0)
}

/// The three metrics computed together for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub pnl_pct: f64,
    pub r_multiple: f64,
    pub days_in_trade: u32,
}

impl RiskMetrics {
    pub fn compute(entry: &EntrySnapshot, current_price: f64, today: NaiveDate) -> Self {
        Self {
            pnl_pct: pnl_pct(entry.entry_price, current_price),
            r_multiple: r_multiple(entry.entry_price, current_price, entry.initial_r),
            days_in_trade: days_in_trade(entry.entry_date, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pnl_is_rounded() {
        assert_eq!(pnl_pct(100.0, 104.0), 4.0);
        assert_eq!(pnl_pct(30.0, 31.0), 3.33);
        assert_eq!(pnl_pct(30.0, 29.0), -3.33);
    }

    #[test]
    fn r_multiple_basic() {
        assert_eq!(r_multiple(100.0, 112.5, 5.0), 2.5);
        assert_eq!(r_multiple(100.0, 94.0, 5.0), -1.2);
        assert_eq!(r_multiple(100.0, 101.0, 3.0), 0.33);
    }

    #[test]
    fn r_multiple_zero_risk_is_zero() {
        assert_eq!(r_multiple(100.0, 150.0, 0.0), 0.0);
        assert_eq!(r_multiple(42.0, 42.0, 0.0), 0.0);
    }

    #[test]
    fn days_counts_calendar_days() {
        assert_eq!(days_in_trade(Some(date(2024, 1, 1)), date(2024, 2, 5)), 35);
        assert_eq!(days_in_trade(Some(date(2024, 1, 1)), date(2024, 1, 1)), 0);
    }

    #[test]
    fn days_without_entry_date_is_zero() {
        assert_eq!(days_in_trade(None, date(2024, 1, 1)), 0);
    }

    #[test]
    fn future_entry_date_clamps_to_zero() {
        assert_eq!(days_in_trade(Some(date(2024, 3, 1)), date(2024, 2, 1)), 0);
    }

    #[test]
    fn metrics_from_entry() {
        let entry = EntrySnapshot::open(100.0, 95.0, Some(date(2024, 1, 1)));
        let m = RiskMetrics::compute(&entry, 105.0, date(2024, 1, 11));
        assert_eq!(m.pnl_pct, 5.0);
        assert_eq!(m.r_multiple, 1.0);
        assert_eq!(m.days_in_trade, 10);
    }
}
