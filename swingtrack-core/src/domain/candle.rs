//! Candle: one daily trading session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV candle, as read from a price file.
///
/// Indicator derivation expects a strictly increasing date sequence; see
/// [`is_chronological`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// True if a price field is missing (NaN).
    pub fn is_void(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .any(|p| p.is_nan())
    }

    /// Prices are present and positive, and open and close both lie inside
    /// the session's low..=high range.
    pub fn is_sane(&self) -> bool {
        let range = self.low..=self.high;
        !self.is_void()
            && self.low > 0.0
            && range.contains(&self.open)
            && range.contains(&self.close)
    }
}

/// True if candle dates are strictly increasing.
pub fn is_chronological(candles: &[Candle]) -> bool {
    candles.windows(2).all(|w| w[0].date < w[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1_250_000,
        }
    }

    #[test]
    fn ordinary_session_is_sane() {
        assert!(session(187.2, 189.9, 186.1, 189.3).is_sane());
    }

    #[test]
    fn missing_close_is_void() {
        let candle = session(187.2, 189.9, 186.1, f64::NAN);
        assert!(candle.is_void());
        assert!(!candle.is_sane());
    }

    #[test]
    fn close_outside_range_is_rejected() {
        assert!(!session(187.2, 189.9, 186.1, 190.5).is_sane());
        assert!(!session(185.0, 189.9, 186.1, 189.3).is_sane());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(!session(187.0, 186.0, 188.0, 187.0).is_sane());
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        assert!(!session(0.0, 1.0, 0.0, 0.5).is_sane());
    }

    #[test]
    fn dates_must_strictly_increase() {
        let monday = session(10.0, 11.0, 9.0, 10.5);
        let mut tuesday = monday.clone();
        tuesday.date = monday.date.succ_opt().unwrap();
        assert!(is_chronological(&[monday.clone(), tuesday.clone()]));
        assert!(!is_chronological(&[tuesday, monday.clone()]));
        assert!(!is_chronological(&[monday.clone(), monday]));
    }
}
