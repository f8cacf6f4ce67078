//! The decision rules and their fixed priority order.
//!
//! Capital preservation (stop hit, momentum break) comes before profit taking
//! (overbought, tighten), which comes before hygiene (distribution, time).
//! Reordering changes outcomes wherever conditions overlap.

use crate::config::EvaluatorConfig;
use crate::domain::{PositionEvaluationInput, PositionStatus, Rationale};
use crate::risk::RiskMetrics;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub input: &'a PositionEvaluationInput,
    pub metrics: RiskMetrics,
    pub current_stop: f64,
}

/// A single rule in the chain. `Hold` is not a rule: it is what remains when
/// no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    StopHit,
    MomentumBreak,
    Overbought,
    TightenStop,
    Distribution,
    TimeStop,
}

impl Rule {
    /// Evaluation order. The first match wins.
    pub const CHAIN: [Rule; 6] = [
        Rule::StopHit,
        Rule::MomentumBreak,
        Rule::Overbought,
        Rule::TightenStop,
        Rule::Distribution,
        Rule::TimeStop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::StopHit => "stop_hit",
            Rule::MomentumBreak => "momentum_break",
            Rule::Overbought => "overbought",
            Rule::TightenStop => "tighten_stop",
            Rule::Distribution => "distribution",
            Rule::TimeStop => "time_stop",
        }
    }

    /// Returns the verdict if this rule matches.
    pub fn check(
        &self,
        ctx: &RuleContext<'_>,
        config: &EvaluatorConfig,
    ) -> Option<(PositionStatus, Rationale)> {
        let price = ctx.input.current.price;
        let ema20 = ctx.input.current.ema20;
        let RiskMetrics {
            pnl_pct,
            r_multiple,
            days_in_trade,
        } = ctx.metrics;

        match self {
            Rule::StopHit => (price <= ctx.current_stop).then(|| {
                (
                    PositionStatus::StopHit,
                    Rationale::StopHit {
                        stop: ctx.current_stop,
                    },
                )
            }),

            Rule::MomentumBreak => (price < ema20).then(|| {
                (
                    PositionStatus::Exit,
                    Rationale::MomentumBroken { price, ema20 },
                )
            }),

            Rule::Overbought => {
                let rsi14 = ctx.input.current.rsi14;
                if rsi14 < config.rsi_overbought {
                    return None;
                }
                if r_multiple >= config.partial_exit_r {
                    Some((
                        PositionStatus::PartialExit,
                        Rationale::OverboughtScaleOut { rsi14, r_multiple },
                    ))
                } else {
                    Some((
                        PositionStatus::Exit,
                        Rationale::OverboughtExit { rsi14, r_multiple },
                    ))
                }
            }

            Rule::TightenStop => {
                let extended = price > ema20 * config.tighten_extension;
                (r_multiple >= config.tighten_stop_r && extended).then(|| {
                    // Break-even or ema20, whichever is tighter, and never
                    // below the stop already in force.
                    let suggested_stop = ctx
                        .input
                        .entry
                        .entry_price
                        .max(ema20)
                        .max(ctx.current_stop);
                    (
                        PositionStatus::TightenStop,
                        Rationale::TightenStop {
                            r_multiple,
                            suggested_stop,
                        },
                    )
                })
            }

            Rule::Distribution => {
                let relative_volume = ctx.input.current.relative_volume;
                (relative_volume > config.distribution_relative_volume
                    && pnl_pct < config.distribution_pnl_pct)
                    .then(|| {
                        (
                            PositionStatus::Exit,
                            Rationale::Distribution {
                                relative_volume,
                                pnl_pct,
                            },
                        )
                    })
            }

            Rule::TimeStop => (days_in_trade >= config.time_stop_days
                && r_multiple.abs() < config.time_stop_r_band)
                .then(|| {
                    (
                        PositionStatus::Exit,
                        Rationale::TimeStop {
                            days_in_trade,
                            r_multiple,
                        },
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentSnapshot, EntrySnapshot, TrailingPolicy};

    fn input(price: f64, ema20: f64, rsi14: f64, relative_volume: f64) -> PositionEvaluationInput {
        PositionEvaluationInput {
            entry: EntrySnapshot::open(100.0, 95.0, None),
            current: CurrentSnapshot {
                price,
                ema20,
                ema50: ema20 - 5.0,
                rsi14,
                relative_volume,
                swing_low: None,
            },
            trailing_policy: TrailingPolicy::Ema20,
        }
    }

    fn ctx(
        input: &PositionEvaluationInput,
        r_multiple: f64,
        pnl_pct: f64,
        days: u32,
    ) -> RuleContext<'_> {
        RuleContext {
            input,
            metrics: RiskMetrics {
                pnl_pct,
                r_multiple,
                days_in_trade: days,
            },
            current_stop: 95.0,
        }
    }

    #[test]
    fn chain_order_is_fixed() {
        let names: Vec<&str> = Rule::CHAIN.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "stop_hit",
                "momentum_break",
                "overbought",
                "tighten_stop",
                "distribution",
                "time_stop"
            ]
        );
    }

    #[test]
    fn stop_hit_at_exact_stop() {
        let i = input(95.0, 90.0, 50.0, 1.0);
        let (status, _) = Rule::StopHit
            .check(&ctx(&i, -1.0, -5.0, 1), &EvaluatorConfig::default())
            .unwrap();
        assert_eq!(status, PositionStatus::StopHit);
    }

    #[test]
    fn overbought_threshold_is_inclusive() {
        let i = input(120.0, 110.0, 70.0, 1.0);
        let (status, _) = Rule::Overbought
            .check(&ctx(&i, 2.0, 20.0, 1), &EvaluatorConfig::default())
            .unwrap();
        assert_eq!(status, PositionStatus::PartialExit);

        let i = input(120.0, 110.0, 69.99, 1.0);
        assert!(Rule::Overbought
            .check(&ctx(&i, 2.0, 20.0, 1), &EvaluatorConfig::default())
            .is_none());
    }

    #[test]
    fn tighten_requires_extension_above_ema20() {
        // 1.05 * 100 = 105: price must be strictly above it.
        let cfg = EvaluatorConfig::default();
        let i = input(105.0, 100.0, 50.0, 1.0);
        assert!(Rule::TightenStop.check(&ctx(&i, 1.5, 5.0, 1), &cfg).is_none());

        let i = input(108.0, 100.0, 50.0, 1.0);
        let (status, rationale) = Rule::TightenStop.check(&ctx(&i, 1.6, 8.0, 1), &cfg).unwrap();
        assert_eq!(status, PositionStatus::TightenStop);
        assert_eq!(
            rationale,
            Rationale::TightenStop {
                r_multiple: 1.6,
                suggested_stop: 100.0
            }
        );
    }

    #[test]
    fn tighten_suggests_ema20_when_above_break_even() {
        let i = input(115.0, 104.0, 50.0, 1.0);
        let (_, rationale) = Rule::TightenStop
            .check(&ctx(&i, 3.0, 15.0, 1), &EvaluatorConfig::default())
            .unwrap();
        assert_eq!(
            rationale,
            Rationale::TightenStop {
                r_multiple: 3.0,
                suggested_stop: 104.0
            }
        );
    }

    #[test]
    fn distribution_needs_both_conditions() {
        let cfg = EvaluatorConfig::default();
        let i = input(97.0, 96.0, 50.0, 2.5);
        assert!(Rule::Distribution.check(&ctx(&i, -0.6, -3.0, 1), &cfg).is_some());
        assert!(Rule::Distribution.check(&ctx(&i, -0.2, -1.0, 1), &cfg).is_none());

        let i = input(97.0, 96.0, 50.0, 2.0);
        assert!(Rule::Distribution.check(&ctx(&i, -0.6, -3.0, 1), &cfg).is_none());
    }

    #[test]
    fn time_stop_band_is_symmetric() {
        let cfg = EvaluatorConfig::default();
        let i = input(99.0, 98.0, 50.0, 1.0);
        assert!(Rule::TimeStop.check(&ctx(&i, -0.4, -1.0, 30), &cfg).is_some());
        assert!(Rule::TimeStop.check(&ctx(&i, 0.5, 2.5, 30), &cfg).is_none());
        assert!(Rule::TimeStop.check(&ctx(&i, 0.1, 0.5, 29), &cfg).is_none());
    }
}
