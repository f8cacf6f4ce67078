//! Indicator trait.
//!
//! Indicators are pure functions: candle history in, numeric series out.
//! The evaluator only ever needs the latest reading (and occasionally the one
//! before it), so the trait offers fail-fast accessors for both.

use crate::domain::Candle;
use crate::error::IndicatorError;

/// Trait for indicators.
///
/// Indicators take a full candle series and produce a numeric output series
/// of the same length. The first `lookback()` values are `f64::NAN` (warmup).
///
/// No value at index t may depend on candles after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading candles that produce no valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    ///
    /// Returns a `Vec<f64>` of the same length as `candles`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;

    /// Minimum number of candles needed for one valid value.
    fn required_history(&self) -> usize {
        self.lookback() + 1
    }

    /// Most recent value.
    ///
    /// Rejects short histories instead of returning a warmup `NaN`, and
    /// rejects a non-finite result computed from degenerate data.
    fn latest(&self, candles: &[Candle]) -> Result<f64, IndicatorError> {
        let required = self.required_history();
        if candles.len() < required {
            return Err(IndicatorError::insufficient(
                self.name(),
                required,
                candles.len(),
            ));
        }
        let value = self.compute(candles).last().copied().unwrap_or(f64::NAN);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(IndicatorError::degenerate(
                self.name(),
                "latest value is not finite",
            ))
        }
    }

    /// Most recent value and the one before it, for slope checks.
    fn latest_pair(&self, candles: &[Candle]) -> Result<(f64, f64), IndicatorError> {
        let required = self.required_history() + 1;
        if candles.len() < required {
            return Err(IndicatorError::insufficient(
                self.name(),
                required,
                candles.len(),
            ));
        }
        let series = self.compute(candles);
        let n = series.len();
        let (latest, previous) = (series[n - 1], series[n - 2]);
        if latest.is_finite() && previous.is_finite() {
            Ok((latest, previous))
        } else {
            Err(IndicatorError::degenerate(
                self.name(),
                "latest values are not finite",
            ))
        }
    }
}
