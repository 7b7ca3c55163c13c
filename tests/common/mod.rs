//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use patterns::domain::models::{FindingFixPair, LifecycleConfig, PatternCandidate, PatternClusterKey};
use patterns::domain::ports::ManualClock;
use patterns::services::PatternCandidateReducer;

/// The fix every convergent fixture pair applies.
pub const STRICT_EQUALITY_FIX: &str = "- if (left == right) {\n+ if (left === right) {";

/// Fixed start instant for deterministic timestamps.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
}

/// Reducer with default thresholds and a manual clock starting at `epoch()`.
pub fn reducer() -> (PatternCandidateReducer, Arc<ManualClock>) {
    reducer_with(LifecycleConfig::default())
}

/// Reducer with custom thresholds and a manual clock starting at `epoch()`.
pub fn reducer_with(config: LifecycleConfig) -> (PatternCandidateReducer, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(epoch()));
    (PatternCandidateReducer::with_clock(config, clock.clone()), clock)
}

/// A confirmed pair applying `diff`.
pub fn confirmed_pair(id: &str, diff: &str) -> FindingFixPair {
    FindingFixPair::confirmed(id, format!("finding-{id}"), vec![diff.to_string()])
}

pub fn cluster() -> PatternClusterKey {
    PatternClusterKey::new("eqeqeq", "binary_expression", "if_statement")
}

/// A candidate holding `n` identical confirmed fixes.
pub fn candidate_with_pairs(reducer: &PatternCandidateReducer, n: usize) -> PatternCandidate {
    let mut candidate = reducer.new_candidate(cluster(), None).expect("empty candidate");
    for i in 0..n {
        reducer
            .ingest_pair(&mut candidate, confirmed_pair(&format!("pair-{i}"), STRICT_EQUALITY_FIX), None)
            .expect("confirmed pair");
    }
    candidate
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
