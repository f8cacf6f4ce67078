//! Swing-low detection for the higher-low trailing policy.
//!
//! A candle is a swing low when its low is strictly below the lows of the
//! `strength` candles on each side. A pivot is only confirmed once all
//! `strength` right-hand candles exist, so the newest candles never qualify.
//!
//! A "higher low" is the most recent pivot in the lookback window, provided it
//! sits above the nearest earlier pivot at least `min_separation` candles away.

use crate::domain::Candle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A confirmed pivot low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingLowDetector {
    /// Candles required on each side of a pivot.
    pub strength: usize,
    /// Number of most recent candles scanned for pivots.
    pub lookback: usize,
    /// Minimum distance, in candles, between the two compared pivots.
    pub min_separation: usize,
}

impl Default for SwingLowDetector {
    fn default() -> Self {
        Self {
            strength: 2,
            lookback: 40,
            min_separation: 3,
        }
    }
}

impl SwingLowDetector {
    pub fn new(strength: usize, lookback: usize, min_separation: usize) -> Self {
        assert!(strength >= 1, "swing strength must be >= 1");
        Self {
            strength,
            lookback,
            min_separation,
        }
    }

    /// Confirmed pivot lows inside the lookback window, oldest first.
    pub fn pivots(&self, candles: &[Candle]) -> Vec<SwingPoint> {
        let n = candles.len();
        let k = self.strength;
        if n < 2 * k + 1 {
            return Vec::new();
        }

        let start = n.saturating_sub(self.lookback).max(k);
        (start..n - k)
            .filter(|&i| self.is_pivot(candles, i))
            .map(|i| SwingPoint {
                index: i,
                date: candles[i].date,
                price: candles[i].low,
            })
            .collect()
    }

    /// Most recent pivot low if it is higher than the previous one.
    pub fn latest_higher_low(&self, candles: &[Candle]) -> Option<SwingPoint> {
        let pivots = self.pivots(candles);
        let (last, earlier) = pivots.split_last()?;
        let previous = earlier
            .iter()
            .rev()
            .find(|p| last.index - p.index >= self.min_separation)?;
        (last.price > previous.price).then_some(*last)
    }

    fn is_pivot(&self, candles: &[Candle], i: usize) -> bool {
        let low = candles[i].low;
        if low.is_nan() {
            return false;
        }
        let k = self.strength;
        (i - k..=i + k)
            .filter(|&j| j != i)
            .all(|j| low < candles[j].low)
    }
}
