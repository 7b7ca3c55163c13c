//! Patterns - Fix-Pattern Candidate Lifecycle
//!
//! Aggregates confirmed "a finding was fixed" records into candidate
//! recurring code patterns and drives each candidate through
//! `CANDIDATE → VALIDATED → PROMOTED → STABLE → DECAYING → DEPRECATED`
//! using promotion gates, diff similarity, score decay, and oscillation
//! detection.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Lifecycle state, value types, the candidate aggregate, ports
//! - **Service Layer** (`services`): Similarity engine, promotion gates, reducer, replay driver
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```
//! use patterns::domain::models::{FindingFixPair, LifecycleConfig, PatternClusterKey, PatternLifecycleState};
//! use patterns::services::{PatternCandidateReducer, TickInputs};
//!
//! let reducer = PatternCandidateReducer::new(LifecycleConfig::default());
//! let fix = vec!["- if (a == b)".to_string(), "+ if (a === b)".to_string()];
//!
//! let mut candidate = reducer
//!     .new_candidate(PatternClusterKey::for_rule("eqeqeq"), None)
//!     .unwrap();
//! for i in 0..3 {
//!     let pair = FindingFixPair::confirmed(format!("pair-{i}"), format!("finding-{i}"), fix.clone());
//!     reducer.ingest_pair(&mut candidate, pair, None).unwrap();
//! }
//!
//! let state = reducer.tick(&mut candidate, &TickInputs::default());
//! assert_eq!(state, PatternLifecycleState::Validated);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, FindingFixPair, LifecycleConfig, PatternCandidate, PatternClusterKey,
    PatternLifecycleState, PromotionGate, PromotionGateResult,
};
pub use domain::ports::{Clock, ManualClock, SystemClock};
pub use domain::{DomainResult, PatternError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{PatternCandidateReducer, PatternReplay, TickInputs};
