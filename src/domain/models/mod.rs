pub mod candidate;
pub mod cluster_key;
pub mod config;
pub mod finding_fix_pair;
pub mod gate_result;
pub mod lifecycle;

pub use candidate::{PatternCandidate, StateTransition, INITIAL_PATTERN_SCORE};
pub use cluster_key::{PatternClusterKey, UNKNOWN_NODE_TYPE};
pub use config::{Config, LifecycleConfig, LoggingConfig};
pub use finding_fix_pair::FindingFixPair;
pub use gate_result::{PromotionGate, PromotionGateResult};
pub use lifecycle::PatternLifecycleState;
