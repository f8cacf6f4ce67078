//! Relative Strength Index.
//!
//! Session-to-session gains and losses are Wilder-smoothed separately and
//! combined as `100 - 100 / (1 + avg_gain / avg_loss)`. The first value lands
//! at index `period`, since the first session has no change.

use super::indicator::Indicator;
use super::smoothing::wilder_smooth;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let (gains, losses) = split_changes(candles);
        let avg_gain = wilder_smooth(&gains, self.period);
        let avg_loss = wilder_smooth(&losses, self.period);
        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(gain, loss)| {
                if gain.is_nan() || loss.is_nan() {
                    f64::NAN
                } else {
                    strength_index(gain, loss)
                }
            })
            .collect()
    }
}

/// Gain and loss magnitude per session. Index 0 and any change touching a
/// NaN close are NaN in both series.
fn split_changes(candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
    let first = candles.first().map(|_| (f64::NAN, f64::NAN));
    first
        .into_iter()
        .chain(candles.windows(2).map(|pair| {
            let change = pair[1].close - pair[0].close;
            if change.is_nan() {
                (f64::NAN, f64::NAN)
            } else {
                (change.max(0.0), (-change).max(0.0))
            }
        }))
        .unzip()
}

fn strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    match (avg_gain == 0.0, avg_loss == 0.0) {
        (true, true) => 50.0,
        (false, true) => 100.0,
        (true, false) => 0.0,
        (false, false) => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    }
}
