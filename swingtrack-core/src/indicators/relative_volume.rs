//! Relative volume: session volume over its trailing average.
//!
//! RV[t] = volume[t] / mean(volume[t-period+1..=t])
//! The averaging window includes the current session.
//! Lookback: period - 1. A zero-volume window yields NaN.

use super::indicator::Indicator;
use super::smoothing::rolling_mean;
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct RelativeVolume {
    period: usize,
    name: String,
}

impl RelativeVolume {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "relative volume period must be >= 1");
        Self {
            period,
            name: format!("rvol_{period}"),
        }
    }
}

impl Indicator for RelativeVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume as f64).collect();
        let means = rolling_mean(&volumes, self.period);
        volumes
            .iter()
            .zip(means)
            .map(|(&v, mean)| if mean > 0.0 { v / mean } else { f64::NAN })
            .collect()
    }
}
