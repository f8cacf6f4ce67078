//! Average True Range, Wilder-smoothed.
//!
//! The first session has no prior close, so its range is left out of the
//! average and the first ATR value lands at index `period`.

use super::indicator::Indicator;
use super::smoothing::wilder_smooth;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let mut ranges = true_range(candles);
        if let Some(first) = ranges.first_mut() {
            *first = f64::NAN;
        }
        wilder_smooth(&ranges, self.period)
    }
}

/// Per-session true range: the high-low span widened to cover any gap from
/// the previous close. The first session uses its own span.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let mut prev_close: Option<f64> = None;
    candles
        .iter()
        .map(|c| {
            let span = c.high - c.low;
            let tr = match prev_close {
                // f64::max ignores a NaN operand
                _ if span.is_nan() => f64::NAN,
                Some(pc) if pc.is_nan() => f64::NAN,
                Some(pc) => span.max((c.high - pc).abs()).max((c.low - pc).abs()),
                None => span,
            };
            prev_close = Some(c.close);
            tr
        })
        .collect()
}
