//! Latest-reading snapshot of every indicator the evaluator consumes.
//!
//! Derivation fails fast when the candle history is shorter than the longest
//! lookback (EMA50) instead of returning warmup values.

use super::indicator::Indicator;
use super::regime::{classify, classify_with_consolidation, Regime};
use super::swing_low::SwingPoint;
use super::{Atr, Ema, RelativeVolume, Rsi};
use crate::config::IndicatorConfig;
use crate::domain::{is_chronological, Candle};
use crate::error::IndicatorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const EMA_FAST_PERIOD: usize = 20;
pub const EMA_SLOW_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const VOLUME_WINDOW: usize = 20;

/// Shortest candle history a snapshot can be derived from.
pub const MIN_HISTORY: usize = EMA_SLOW_PERIOD;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub ema20: f64,
    pub ema20_prev: Option<f64>,
    pub ema50: f64,
    pub ema50_prev: Option<f64>,
    pub rsi14: f64,
    pub atr14: f64,
    /// `None` when the volume window is all zeros (e.g. index data).
    pub relative_volume: Option<f64>,
    pub regime: Regime,
    pub screening_regime: Regime,
    pub higher_low: Option<SwingPoint>,
}

impl IndicatorSnapshot {
    pub fn derive(candles: &[Candle], config: &IndicatorConfig) -> Result<Self, IndicatorError> {
        if candles.len() < MIN_HISTORY {
            return Err(IndicatorError::insufficient(
                "indicator_snapshot",
                MIN_HISTORY,
                candles.len(),
            ));
        }
        if !is_chronological(candles) {
            return Err(IndicatorError::degenerate(
                "indicator_snapshot",
                "candles are not in chronological order",
            ));
        }

        let last = &candles[candles.len() - 1];
        let (ema20, ema20_prev) = latest_with_previous(&Ema::new(EMA_FAST_PERIOD), candles)?;
        let (ema50, ema50_prev) = latest_with_previous(&Ema::new(EMA_SLOW_PERIOD), candles)?;
        let rsi14 = Rsi::new(RSI_PERIOD).latest(candles)?;
        let atr14 = Atr::new(ATR_PERIOD).latest(candles)?;

        let relative_volume = match RelativeVolume::new(VOLUME_WINDOW).latest(candles) {
            Ok(v) => Some(v),
            Err(IndicatorError::Degenerate { reason, .. }) => {
                debug!(date = %last.date, %reason, "relative volume unavailable");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            date: last.date,
            close: last.close,
            ema20,
            ema20_prev,
            ema50,
            ema50_prev,
            rsi14,
            atr14,
            relative_volume,
            regime: classify(ema20, ema50),
            screening_regime: classify_with_consolidation(
                last.close,
                ema20,
                ema50,
                config.consolidation_band_pct,
            ),
            higher_low: config.swing_low.latest_higher_low(candles),
        })
    }

    /// Change in ema20 over the last session, when a previous value exists.
    pub fn ema20_slope(&self) -> Option<f64> {
        self.ema20_prev.map(|prev| self.ema20 - prev)
    }

    pub fn ema50_slope(&self) -> Option<f64> {
        self.ema50_prev.map(|prev| self.ema50 - prev)
    }
}

fn latest_with_previous(
    indicator: &dyn Indicator,
    candles: &[Candle],
) -> Result<(f64, Option<f64>), IndicatorError> {
    if candles.len() > indicator.required_history() {
        let (latest, previous) = indicator.latest_pair(candles)?;
        Ok((latest, Some(previous)))
    } else {
        Ok((indicator.latest(candles)?, None))
    }
}
