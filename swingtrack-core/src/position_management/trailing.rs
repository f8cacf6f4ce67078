//! Trailing stop resolution.
//!
//! Computes the protective stop that applies right now, given the trailing
//! policy and current market readings. The result is never below the
//! initial stop.

use crate::domain::TrailingPolicy;
use tracing::warn;

/// Resolve the currently applicable stop price.
///
/// - `Ema20`: trail at ema20 while price is above it, else the initial stop.
/// - `HigherLow`: hold the stop at the latest confirmed higher swing low,
///   whatever the price, so a close through it reads as a stop hit; with no
///   swing low available, behaves like `Ema20`.
/// - `Unknown`: the initial stop.
///
/// `ema50` is accepted for policies keyed to the slow average; none of the
/// current policies read it.
pub fn resolve_stop(
    policy: TrailingPolicy,
    current_price: f64,
    ema20: f64,
    _ema50: f64,
    initial_stop: f64,
    swing_low: Option<f64>,
) -> f64 {
    match policy {
        TrailingPolicy::Ema20 => trail_under(current_price, ema20, initial_stop),
        TrailingPolicy::HigherLow => match swing_low {
            Some(low) => low.max(initial_stop),
            None => trail_under(current_price, ema20, initial_stop),
        },
        TrailingPolicy::Unknown => {
            warn!(initial_stop, "unknown trailing policy, keeping initial stop");
            initial_stop
        }
    }
}

fn trail_under(current_price: f64, level: f64, initial_stop: f64) -> f64 {
    if current_price > level {
        level.max(initial_stop)
    } else {
        initial_stop
    }
}
