/// Ratchet invariant enforcement
///
/// **Core Rule:** Stops may tighten, never loosen, and never drop below the
/// initial stop recorded at entry.
///
/// The evaluator is stateless, so a single evaluation already floors its stop
/// at the initial stop. `RatchetState` carries the level across successive
/// evaluations for callers that track a position over time.

/// Running stop level for a long position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatchetState {
    /// Initial stop; the level never goes below this.
    floor: f64,

    /// Highest stop applied so far.
    current_level: f64,
}

impl RatchetState {
    /// Start a ratchet at the initial stop.
    pub fn new(initial_stop: f64) -> Self {
        Self {
            floor: initial_stop,
            current_level: initial_stop,
        }
    }

    /// Apply a proposed stop and return the ratcheted level.
    ///
    /// # Example
    /// ```
    /// use swingtrack_core::position_management::RatchetState;
    ///
    /// let mut ratchet = RatchetState::new(95.0);
    ///
    /// // Tightening: $95 → $100 (allowed)
    /// assert_eq!(ratchet.apply(100.0), 100.0);
    ///
    /// // Loosening: $100 → $90 (blocked, stays at $100)
    /// assert_eq!(ratchet.apply(90.0), 100.0);
    /// ```
    pub fn apply(&mut self, proposed: f64) -> f64 {
        // NaN proposals are ignored: f64::max returns the non-NaN operand.
        self.current_level = self.current_level.max(proposed).max(self.floor);
        self.current_level
    }

    pub fn current_level(&self) -> f64 {
        self.current_level
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratchet_tightening_allowed() {
        let mut ratchet = RatchetState::new(95.0);
        assert_eq!(ratchet.apply(100.0), 100.0);
        assert_eq!(ratchet.current_level(), 100.0);
    }

    #[test]
    fn test_ratchet_loosening_blocked() {
        let mut ratchet = RatchetState::new(95.0);
        ratchet.apply(100.0);
        assert_eq!(ratchet.apply(90.0), 100.0);
    }

    #[test]
    fn test_ratchet_never_below_floor() {
        let mut ratchet = RatchetState::new(95.0);
        assert_eq!(ratchet.apply(80.0), 95.0);
        assert_eq!(ratchet.floor(), 95.0);
    }

    #[test]
    fn test_ratchet_ignores_nan() {
        let mut ratchet = RatchetState::new(95.0);
        ratchet.apply(101.0);
        assert_eq!(ratchet.apply(f64::NAN), 101.0);
    }

    #[test]
    fn test_ratchet_ema_pullback_scenario() {
        // EMA20 rises to 104 then price dips under it: the proposed stop
        // falls back to the initial stop, the ratchet holds at 104.
        let mut ratchet = RatchetState::new(95.0);
        ratchet.apply(102.0);
        ratchet.apply(104.0);
        assert_eq!(ratchet.apply(95.0), 104.0);
    }
}
