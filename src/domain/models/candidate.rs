//! Pattern candidate aggregate.
//!
//! One candidate exists per cluster. It accumulates confirmed finding/fix
//! pairs and records every lifecycle transition in an append-only history.
//! All mutation goes through `PatternCandidateReducer`; the caller owns the
//! value and must serialize calls against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::cluster_key::PatternClusterKey;
use super::finding_fix_pair::FindingFixPair;
use super::lifecycle::PatternLifecycleState;

/// Score every candidate starts with.
pub const INITIAL_PATTERN_SCORE: f64 = 1.0;

/// One entry of a candidate's state history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// State entered
    pub state: PatternLifecycleState,
    /// When the state was entered
    pub at: DateTime<Utc>,
    /// Why the transition happened
    pub reason: String,
}

/// An evolving cluster of fixes hypothesized to be one recurring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCandidate {
    /// Unique identifier, assigned at creation
    pub candidate_id: Uuid,
    /// Clustering identity; may be rebound on ingestion
    pub cluster_key: PatternClusterKey,
    /// Current lifecycle state
    pub state: PatternLifecycleState,
    /// Every pair ever ingested, in arrival order
    pub confirmed_pairs: Vec<FindingFixPair>,
    /// Pairs whose fix was later reverted
    pub reintroduced_pair_ids: BTreeSet<String>,
    /// Trust score in (0, 1]
    pub pattern_score: f64,
    /// Normalized diff captured on validation
    pub transform_signature: Option<String>,
    /// Number of reintroductions observed
    pub oscillation_count: u32,
    /// When the candidate was created
    pub created_at: DateTime<Utc>,
    /// Last ingestion or observed recurrence
    pub last_recurrence_at: DateTime<Utc>,
    /// Set on `Candidate → Validated`
    pub validated_at: Option<DateTime<Utc>>,
    /// Set on `Validated → Promoted`
    pub promoted_at: Option<DateTime<Utc>>,
    /// Set when the candidate is retired
    pub deprecated_at: Option<DateTime<Utc>>,
    /// Append-only transition log
    pub state_history: Vec<StateTransition>,
}

impl PatternCandidate {
    /// Create a fresh candidate with its history seeded by the initial
    /// `Candidate` entry.
    pub(crate) fn new(cluster_key: PatternClusterKey, now: DateTime<Utc>) -> Self {
        Self {
            candidate_id: Uuid::new_v4(),
            cluster_key,
            state: PatternLifecycleState::Candidate,
            confirmed_pairs: Vec::new(),
            reintroduced_pair_ids: BTreeSet::new(),
            pattern_score: INITIAL_PATTERN_SCORE,
            transform_signature: None,
            oscillation_count: 0,
            created_at: now,
            last_recurrence_at: now,
            validated_at: None,
            promoted_at: None,
            deprecated_at: None,
            state_history: vec![StateTransition {
                state: PatternLifecycleState::Candidate,
                at: now,
                reason: "candidate created".to_string(),
            }],
        }
    }

    /// Move to `state` and append the history entry.
    pub(crate) fn record_transition(
        &mut self,
        state: PatternLifecycleState,
        at: DateTime<Utc>,
        reason: impl Into<String>,
    ) {
        self.state = state;
        self.state_history.push(StateTransition {
            state,
            at,
            reason: reason.into(),
        });
    }

    pub fn occurrence_count(&self) -> usize {
        self.confirmed_pairs.len()
    }

    /// Fraction of ingested pairs that were later reintroduced.
    pub fn reintroduction_rate(&self) -> f64 {
        if self.confirmed_pairs.is_empty() {
            return 0.0;
        }
        self.reintroduced_pair_ids.len() as f64 / self.confirmed_pairs.len() as f64
    }

    pub fn is_deprecated(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }
}
