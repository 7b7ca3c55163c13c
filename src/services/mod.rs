//! Service layer: similarity engine, promotion gates, the lifecycle reducer,
//! and the replay driver.

pub mod pattern_reducer;
pub mod promotion_gates;
pub mod replay;
pub mod similarity;

pub use pattern_reducer::{PatternCandidateReducer, TickInputs};
pub use promotion_gates::evaluate_promotion_gates;
pub use replay::{PatternReplay, ReplayEvent, ReplayStats};
pub use similarity::{edit_similarity, normalize_diff, transform_similarity, MAX_COMPARE_CHARS};
