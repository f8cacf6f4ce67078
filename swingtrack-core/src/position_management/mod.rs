/// Position management: trailing stops + ratchet invariant
///
/// **Key Design Principles:**
/// 1. Stops are resolved from the trailing policy and current readings
/// 2. **Ratchet invariant**: stops may tighten, never loosen, never below the initial stop
///
/// **Module Structure:**
/// - `trailing`: policy-driven stop resolution for one evaluation
/// - `ratchet`: running stop level across evaluations
pub mod ratchet;
pub mod trailing;

pub use ratchet::RatchetState;
pub use trailing::resolve_stop;
