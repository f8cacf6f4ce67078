//! SwingTrack Core: daily evaluation of open swing-trading positions.
//!
//! This crate contains the decision engine:
//! - Domain types (candles, entry/current snapshots, decisions)
//! - Indicator derivation (EMA, RSI, ATR, relative volume, swing lows, regime)
//! - Risk metrics (P/L percent, R-multiple, days in trade)
//! - Trailing stop resolution with ratchet invariant
//! - Priority-ordered evaluator producing a status and structured rationale
//! - Input building, batch evaluation, replay and decision fingerprinting
//!
//! Every evaluation is a pure function of its input and the `today` date
//! passed in. Nothing here reads the clock, the network or the filesystem,
//! except `EngineConfig::from_file`.

pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod fingerprint;
pub mod indicators;
pub mod input_builder;
pub mod position_management;
pub mod replay;
pub mod risk;

pub use config::{EngineConfig, EvaluatorConfig, IndicatorConfig};
pub use domain::{
    Candle, CurrentSnapshot, EntrySnapshot, PositionDecision, PositionEvaluationInput,
    PositionStatus, Rationale, TrailingPolicy,
};
pub use error::{EvaluationError, IndicatorError};
pub use evaluator::PositionEvaluator;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: every public boundary type is Send + Sync, so
    /// batch evaluation can share them across the rayon pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::EntrySnapshot>();
        require_sync::<domain::EntrySnapshot>();
        require_send::<domain::CurrentSnapshot>();
        require_sync::<domain::CurrentSnapshot>();
        require_send::<domain::PositionEvaluationInput>();
        require_sync::<domain::PositionEvaluationInput>();
        require_send::<domain::PositionDecision>();
        require_sync::<domain::PositionDecision>();
        require_send::<domain::Rationale>();
        require_sync::<domain::Rationale>();

        // Indicators
        require_send::<indicators::IndicatorSnapshot>();
        require_sync::<indicators::IndicatorSnapshot>();
        require_send::<indicators::SwingLowDetector>();
        require_sync::<indicators::SwingLowDetector>();

        // Engine
        require_send::<PositionEvaluator>();
        require_sync::<PositionEvaluator>();
        require_send::<EngineConfig>();
        require_sync::<EngineConfig>();
        require_send::<batch::BatchEvaluator>();
        require_sync::<batch::BatchEvaluator>();
        require_send::<batch::BatchReport>();
        require_sync::<batch::BatchReport>();
        require_send::<position_management::RatchetState>();
        require_sync::<position_management::RatchetState>();
        require_send::<input_builder::PositionRecord>();
        require_sync::<input_builder::PositionRecord>();
        require_send::<fingerprint::EvaluationRecord>();
        require_sync::<fingerprint::EvaluationRecord>();
        require_send::<replay::Replay>();
        require_sync::<replay::Replay>();

        // Errors
        require_send::<EvaluationError>();
        require_sync::<EvaluationError>();
        require_send::<config::ConfigError>();
        require_sync::<config::ConfigError>();
    }

    /// Architecture contract: indicators can be used as trait objects.
    #[test]
    fn indicator_trait_is_object_safe() {
        fn _check(ind: &dyn indicators::Indicator, candles: &[domain::Candle]) -> Vec<f64> {
            ind.compute(candles)
        }
        let boxed: Vec<Box<dyn indicators::Indicator>> = vec![
            Box::new(indicators::Ema::new(20)),
            Box::new(indicators::Rsi::new(14)),
        ];
        assert_eq!(boxed.len(), 2);
    }
}
