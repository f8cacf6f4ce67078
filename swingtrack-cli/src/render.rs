//! Human-readable output. The core hands back structured rationales; the
//! wording lives here.

use swingtrack_core::domain::{PositionDecision, Rationale};
use swingtrack_core::indicators::IndicatorSnapshot;
use swingtrack_core::replay::ReplayStep;

pub fn rationale_text(rationale: &Rationale) -> String {
    match rationale {
        Rationale::StopHit { stop } => format!("Price traded at or below the stop ({stop:.2})"),
        Rationale::MomentumBroken { price, ema20 } => {
            format!("Close {price:.2} below 20 EMA {ema20:.2}: momentum broken")
        }
        Rationale::OverboughtScaleOut { rsi14, r_multiple } => format!(
            "RSI {rsi14:.1} overbought at {r_multiple:.2}R: take partial profits"
        ),
        Rationale::OverboughtExit { rsi14, r_multiple } => format!(
            "RSI {rsi14:.1} overbought with only {r_multiple:.2}R: exit before the reversal"
        ),
        Rationale::TightenStop {
            r_multiple,
            suggested_stop,
        } => format!(
            "{r_multiple:.2}R and extended above the 20 EMA: raise stop to {suggested_stop:.2}"
        ),
        Rationale::Distribution {
            relative_volume,
            pnl_pct,
        } => format!(
            "Relative volume {relative_volume:.2}x on a {pnl_pct:.2}% loss: distribution"
        ),
        Rationale::TimeStop {
            days_in_trade,
            r_multiple,
        } => format!("{days_in_trade} days in trade at {r_multiple:.2}R: time stop"),
    }
}

pub fn print_decision(label: &str, decision: &PositionDecision) {
    println!();
    println!("=== {label} ===");
    println!("Status:         {}", decision.status.as_str());
    if let Some(r) = &decision.rationale {
        println!("Rationale:      {}", rationale_text(r));
    }
    println!("Current Stop:   {:.2}", decision.current_stop);
    println!("P/L:            {:.2}%", decision.pnl_pct);
    println!("R-Multiple:     {:.2}", decision.r_multiple);
    println!("Days in Trade:  {}", decision.days_in_trade);
}

/// One line per position, for batch output.
pub fn decision_row(id: &str, decision: &PositionDecision) -> String {
    let why = decision
        .rationale
        .as_ref()
        .map(rationale_text)
        .unwrap_or_default();
    format!(
        "{:<10} {:<13} {:>9.2} {:>8.2}% {:>7.2}R {:>5}  {}",
        id,
        decision.status.as_str(),
        decision.current_stop,
        decision.pnl_pct,
        decision.r_multiple,
        decision.days_in_trade,
        why
    )
}

pub fn batch_header() -> String {
    format!(
        "{:<10} {:<13} {:>9} {:>9} {:>8} {:>5}  {}",
        "Id", "Status", "Stop", "P/L", "R", "Days", "Rationale"
    )
}

pub fn print_snapshot(snap: &IndicatorSnapshot) {
    let opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.2}"));

    println!();
    println!("=== Indicators as of {} ===", snap.date);
    println!("Close:          {:.2}", snap.close);
    println!("EMA20:          {:.2} (slope {})", snap.ema20, opt(snap.ema20_slope()));
    println!("EMA50:          {:.2} (slope {})", snap.ema50, opt(snap.ema50_slope()));
    println!("RSI14:          {:.1}", snap.rsi14);
    println!("ATR14:          {:.2}", snap.atr14);
    println!("Rel. Volume:    {}", opt(snap.relative_volume));
    println!("Regime:         {:?}", snap.regime);
    println!("Screening:      {:?}", snap.screening_regime);
    match &snap.higher_low {
        Some(p) => println!("Higher Low:     {:.2} on {}", p.price, p.date),
        None => println!("Higher Low:     none"),
    }
}

pub fn replay_row(step: &ReplayStep) -> String {
    format!(
        "{} {:>9.2} {:<13} {:>9.2} {:>9.2}{}",
        step.date,
        step.close,
        step.decision.status.as_str(),
        step.decision.current_stop,
        step.ratcheted_stop,
        if step.below_ratchet { "  below ratchet" } else { "" }
    )
}
