//! Decision output: status, structured rationale and the numbers behind it.
//!
//! The rationale is data, not prose. Rendering it for a human is left to the
//! presentation layer.

use serde::{Deserialize, Serialize};

/// The action recommended for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Hold,
    TightenStop,
    PartialExit,
    Exit,
    StopHit,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Hold => "HOLD",
            PositionStatus::TightenStop => "TIGHTEN_STOP",
            PositionStatus::PartialExit => "PARTIAL_EXIT",
            PositionStatus::Exit => "EXIT",
            PositionStatus::StopHit => "STOP_HIT",
        }
    }

    /// True for every status other than `Hold`.
    pub fn requires_action(&self) -> bool {
        !matches!(self, PositionStatus::Hold)
    }
}

/// Why a rule fired, with the values it fired on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rationale {
    /// Price traded at or through the protective stop.
    StopHit { stop: f64 },
    /// Close below the 20 EMA.
    MomentumBroken { price: f64, ema20: f64 },
    /// Overbought with enough open profit to bank part of it.
    OverboughtScaleOut { rsi14: f64, r_multiple: f64 },
    /// Overbought without enough profit to hold through a reversal.
    OverboughtExit { rsi14: f64, r_multiple: f64 },
    /// Large open gain stretched above the 20 EMA.
    TightenStop { r_multiple: f64, suggested_stop: f64 },
    /// Heavy volume on a losing position.
    Distribution { relative_volume: f64, pnl_pct: f64 },
    /// Held too long without meaningful progress.
    TimeStop { days_in_trade: u32, r_multiple: f64 },
}

impl Rationale {
    /// Stable machine-readable code for this rationale.
    pub fn code(&self) -> &'static str {
        match self {
            Rationale::StopHit { .. } => "STOP_HIT",
            Rationale::MomentumBroken { .. } => "MOMENTUM_BROKEN",
            Rationale::OverboughtScaleOut { .. } => "OVERBOUGHT_SCALE_OUT",
            Rationale::OverboughtExit { .. } => "OVERBOUGHT_EXIT",
            Rationale::TightenStop { .. } => "TIGHTEN_STOP",
            Rationale::Distribution { .. } => "DISTRIBUTION",
            Rationale::TimeStop { .. } => "TIME_STOP",
        }
    }
}

/// Result of one evaluation. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDecision {
    pub status: PositionStatus,
    pub rationale: Option<Rationale>,
    pub current_stop: f64,
    pub pnl_pct: f64,
    pub r_multiple: f64,
    pub days_in_trade: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&PositionStatus::PartialExit).unwrap();
        assert_eq!(json, "\"PARTIAL_EXIT\"");
        assert_eq!(PositionStatus::StopHit.as_str(), "STOP_HIT");
    }

    #[test]
    fn hold_requires_no_action() {
        assert!(!PositionStatus::Hold.requires_action());
        assert!(PositionStatus::TightenStop.requires_action());
    }

    #[test]
    fn rationale_is_tagged() {
        let r = Rationale::StopHit { stop: 95.0 };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], "STOP_HIT");
        assert_eq!(json["stop"], 95.0);
        assert_eq!(r.code(), "STOP_HIT");
    }

    #[test]
    fn hold_decision_has_null_rationale() {
        let d = PositionDecision {
            status: PositionStatus::Hold,
            rationale: None,
            current_stop: 95.0,
            pnl_pct: 5.0,
            r_multiple: 1.0,
            days_in_trade: 5,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert!(json["rationale"].is_null());
    }
}
