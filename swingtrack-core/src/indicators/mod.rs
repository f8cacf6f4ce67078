//! Indicator derivation.
//!
//! Every indicator implements the `Indicator` trait: a pure function from an
//! ordered candle series to a same-length output series. `IndicatorSnapshot`
//! collects the latest readings the evaluator needs in one pass.

pub mod atr;
pub mod indicator;
pub mod moving_average;
pub mod regime;
pub mod relative_volume;
pub mod rsi;
pub mod smoothing;
pub mod snapshot;
pub mod swing_low;

pub use atr::Atr;
pub use indicator::Indicator;
pub use moving_average::{Ema, Sma};
pub use regime::Regime;
pub use relative_volume::RelativeVolume;
pub use rsi::Rsi;
pub use snapshot::{IndicatorSnapshot, MIN_HISTORY};
pub use swing_low::{SwingLowDetector, SwingPoint};

#[cfg(test)]
fn test_session(day: usize, open: f64, high: f64, low: f64, close: f64) -> crate::domain::Candle {
    let first = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    crate::domain::Candle {
        date: first + chrono::Duration::days(day as i64),
        open,
        high,
        low,
        close,
        volume: 1000,
    }
}

/// Consecutive daily candles from closes. Each opens at the prior close and
/// trades one point beyond its body either way; volume is a flat 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    let opens = closes.first().into_iter().chain(closes.iter());
    opens
        .zip(closes)
        .enumerate()
        .map(|(day, (&open, &close))| {
            test_session(day, open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect()
}

/// Consecutive daily candles from `(open, high, low, close)` rows.
#[cfg(test)]
pub fn make_ohlc_candles(rows: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    rows.iter()
        .enumerate()
        .map(|(day, &(o, h, l, c))| test_session(day, o, h, l, c))
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(diff < epsilon, "expected {expected}, got {actual} (diff {diff})");
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
