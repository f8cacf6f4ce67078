//! Domain types for SwingTrack

pub mod candle;
pub mod decision;
pub mod position;

pub use candle::{is_chronological, Candle};
pub use decision::{PositionDecision, PositionStatus, Rationale};
pub use position::{CurrentSnapshot, EntrySnapshot, PositionEvaluationInput, TrailingPolicy};
