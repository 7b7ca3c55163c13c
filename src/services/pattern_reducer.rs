//! Pattern candidate lifecycle reducer.
//!
//! Drives a caller-owned [`PatternCandidate`] through
//! `Candidate → Validated → Promoted → Stable → Decaying → Deprecated`.
//! The reducer holds only configuration and a clock; it performs no I/O and
//! keeps no candidates. Calls against the same candidate must be serialized
//! by the caller.
//!
//! Every transition method is total: invoked in the wrong source state it
//! leaves the candidate untouched and logs the mismatch, so a driver can call
//! [`PatternCandidateReducer::tick`] on every event without tracking state.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainResult, PatternError};
use crate::domain::models::{
    FindingFixPair, LifecycleConfig, PatternCandidate, PatternClusterKey, PatternLifecycleState,
    PromotionGate, PromotionGateResult,
};
use crate::domain::ports::{Clock, SystemClock};
use crate::services::promotion_gates::evaluate_promotion_gates;
use crate::services::similarity::normalize_diff;

/// Per-tick observations supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    /// The acceptance suite passed for a validated pattern
    pub acceptance_passed: bool,
    /// Replaying the pattern over history introduced no regressions
    pub replay_clean: bool,
    /// The pattern recurred since the last tick
    pub recurrence_observed: bool,
    /// Pair id → analyzer version, for the tool-version gate
    pub tool_version_map: Option<&'a HashMap<String, String>>,
}

impl Default for TickInputs<'_> {
    fn default() -> Self {
        Self {
            acceptance_passed: true,
            replay_clean: true,
            recurrence_observed: false,
            tool_version_map: None,
        }
    }
}

/// Stateless driver for the pattern lifecycle.
#[derive(Clone)]
pub struct PatternCandidateReducer {
    config: LifecycleConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PatternCandidateReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCandidateReducer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for PatternCandidateReducer {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl PatternCandidateReducer {
    /// Create a reducer reading wall-clock time.
    pub fn new(config: LifecycleConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a reducer with an injected time source.
    ///
    /// The config is used as given; load it through
    /// [`ConfigLoader`](crate::infrastructure::config::ConfigLoader) to have
    /// it validated. An out-of-range config never panics: at least one pair
    /// is always required for validation, and a stable window too large to
    /// represent never elapses.
    pub fn with_clock(config: LifecycleConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Create a candidate for `cluster_key`, optionally ingesting a first pair.
    pub fn new_candidate(
        &self,
        cluster_key: PatternClusterKey,
        initial_pair: Option<FindingFixPair>,
    ) -> DomainResult<PatternCandidate> {
        let mut candidate = PatternCandidate::new(cluster_key, self.clock.now());
        if let Some(pair) = initial_pair {
            self.ingest_pair(&mut candidate, pair, None)?;
        }

        debug!(
            candidate_id = %candidate.candidate_id,
            cluster = %candidate.cluster_key,
            "created pattern candidate"
        );
        Ok(candidate)
    }

    /// Append a confirmed pair to the candidate.
    ///
    /// Pairs whose finding disappearance was not confirmed are rejected;
    /// this is the single validation boundary for confirmed pairs.
    pub fn ingest_pair(
        &self,
        candidate: &mut PatternCandidate,
        pair: FindingFixPair,
        cluster_key: Option<PatternClusterKey>,
    ) -> DomainResult<()> {
        if !pair.disappearance_confirmed {
            warn!(
                candidate_id = %candidate.candidate_id,
                pair_id = %pair.pair_id,
                "rejected pair without confirmed disappearance"
            );
            return Err(PatternError::UnconfirmedPair {
                pair_id: pair.pair_id,
            });
        }

        if let Some(key) = cluster_key {
            candidate.cluster_key = key;
        }
        candidate.confirmed_pairs.push(pair);
        candidate.last_recurrence_at = self.clock.now();
        Ok(())
    }

    /// Record that the fix of `pair_id` was reverted.
    pub fn mark_reintroduced(&self, candidate: &mut PatternCandidate, pair_id: impl Into<String>) {
        candidate.reintroduced_pair_ids.insert(pair_id.into());
        candidate.oscillation_count += 1;
        debug!(
            candidate_id = %candidate.candidate_id,
            oscillation_count = candidate.oscillation_count,
            "fix reintroduced"
        );
    }

    /// Evaluate the promotion gates with this reducer's thresholds.
    pub fn evaluate_promotion_gates(
        &self,
        candidate: &PatternCandidate,
        tool_version_map: Option<&HashMap<String, String>>,
    ) -> PromotionGateResult {
        evaluate_promotion_gates(candidate, tool_version_map, &self.config)
    }

    /// `Candidate → Validated` when every promotion gate passes.
    pub fn try_validate(
        &self,
        candidate: &mut PatternCandidate,
        tool_version_map: Option<&HashMap<String, String>>,
    ) -> PromotionGateResult {
        if candidate.state != PatternLifecycleState::Candidate {
            self.log_wrong_state(candidate, "try_validate");
            return PromotionGateResult::failed(
                PromotionGate::WrongState,
                format!("candidate is {}, expected CANDIDATE", candidate.state),
            );
        }

        let result = self.evaluate_promotion_gates(candidate, tool_version_map);
        if !result.passed {
            debug!(
                candidate_id = %candidate.candidate_id,
                gate = result.gate_name(),
                detail = %result.gate_detail,
                "promotion gates not met"
            );
            return result;
        }

        let now = self.clock.now();
        candidate.transform_signature = candidate
            .confirmed_pairs
            .first()
            .map(|pair| normalize_diff(&pair.joined_diff()));
        candidate.validated_at = Some(now);
        self.transition(
            candidate,
            PatternLifecycleState::Validated,
            now,
            format!(
                "promotion gates passed: {} pairs, similarity {:.3}",
                result.occurrence_count, result.similarity_score
            ),
        );
        result
    }

    /// `Validated → Promoted`, or straight to `Deprecated` when acceptance
    /// or replay fails.
    pub fn promote(
        &self,
        candidate: &mut PatternCandidate,
        acceptance_passed: bool,
        replay_clean: bool,
    ) -> PatternLifecycleState {
        if candidate.state != PatternLifecycleState::Validated {
            self.log_wrong_state(candidate, "promote");
            return candidate.state;
        }

        if !acceptance_passed {
            return self.deprecate(candidate, "acceptance suite failed");
        }
        if !replay_clean {
            return self.deprecate(candidate, "replay regression failed");
        }

        let now = self.clock.now();
        candidate.promoted_at = Some(now);
        self.transition(
            candidate,
            PatternLifecycleState::Promoted,
            now,
            "acceptance passed and replay clean",
        );
        candidate.state
    }

    /// `Promoted → Stable` once the stable window has elapsed without any
    /// reintroduction.
    pub fn stabilize(&self, candidate: &mut PatternCandidate) -> PatternLifecycleState {
        let promoted_at = match (candidate.state, candidate.promoted_at) {
            (PatternLifecycleState::Promoted, Some(at)) => at,
            _ => {
                self.log_wrong_state(candidate, "stabilize");
                return candidate.state;
            }
        };

        let now = self.clock.now();
        // An unrepresentable window never elapses.
        let elapsed = Duration::try_days(self.config.stable_window_days)
            .is_some_and(|window| now - promoted_at >= window);
        if !elapsed || !candidate.reintroduced_pair_ids.is_empty() {
            debug!(
                candidate_id = %candidate.candidate_id,
                reintroduced = candidate.reintroduced_pair_ids.len(),
                "not yet eligible for stabilization"
            );
            return candidate.state;
        }

        self.transition(
            candidate,
            PatternLifecycleState::Stable,
            now,
            format!(
                "held {} days with no reintroduction",
                self.config.stable_window_days
            ),
        );
        candidate.state
    }

    /// Decay the score of a stable or decaying pattern that did not recur.
    ///
    /// An observed recurrence resets `last_recurrence_at` without penalty.
    pub fn apply_decay(
        &self,
        candidate: &mut PatternCandidate,
        recurrence_observed: bool,
    ) -> PatternLifecycleState {
        if !candidate.state.is_decay_eligible() {
            self.log_wrong_state(candidate, "apply_decay");
            return candidate.state;
        }

        let now = self.clock.now();
        if recurrence_observed {
            candidate.last_recurrence_at = now;
            debug!(candidate_id = %candidate.candidate_id, "recurrence observed, decay reset");
            return candidate.state;
        }

        candidate.pattern_score *= self.config.decay_factor;
        debug!(
            candidate_id = %candidate.candidate_id,
            pattern_score = candidate.pattern_score,
            "pattern score decayed"
        );

        if candidate.state == PatternLifecycleState::Stable {
            self.transition(
                candidate,
                PatternLifecycleState::Decaying,
                now,
                "no recurrence observed",
            );
        }

        if candidate.pattern_score < self.config.min_score_threshold {
            let reason = format!(
                "pattern score {:.4} fell below {:.4}",
                candidate.pattern_score, self.config.min_score_threshold
            );
            return self.deprecate(candidate, &reason);
        }

        candidate.state
    }

    /// Fast-path from any live state to `Deprecated`.
    pub fn deprecate(&self, candidate: &mut PatternCandidate, reason: &str) -> PatternLifecycleState {
        if candidate.is_deprecated() {
            self.log_wrong_state(candidate, "deprecate");
            return candidate.state;
        }

        let now = self.clock.now();
        candidate.deprecated_at = Some(now);
        self.transition(candidate, PatternLifecycleState::Deprecated, now, reason);
        candidate.state
    }

    /// Advance the candidate by at most one lifecycle step.
    ///
    /// Reaching the oscillation ceiling deprecates any live candidate before
    /// normal progression is considered.
    pub fn tick(&self, candidate: &mut PatternCandidate, inputs: &TickInputs<'_>) -> PatternLifecycleState {
        if !candidate.is_deprecated() && candidate.oscillation_count >= self.config.max_oscillations {
            let reason = format!(
                "oscillated {} times (ceiling {})",
                candidate.oscillation_count, self.config.max_oscillations
            );
            return self.deprecate(candidate, &reason);
        }

        match candidate.state {
            PatternLifecycleState::Candidate => {
                self.try_validate(candidate, inputs.tool_version_map);
            }
            PatternLifecycleState::Validated => {
                self.promote(candidate, inputs.acceptance_passed, inputs.replay_clean);
            }
            PatternLifecycleState::Promoted => {
                self.stabilize(candidate);
            }
            PatternLifecycleState::Stable | PatternLifecycleState::Decaying => {
                self.apply_decay(candidate, inputs.recurrence_observed);
            }
            PatternLifecycleState::Deprecated => {}
        }

        candidate.state
    }

    fn transition(
        &self,
        candidate: &mut PatternCandidate,
        to: PatternLifecycleState,
        at: DateTime<Utc>,
        reason: impl Into<String>,
    ) {
        let from = candidate.state;
        let reason = reason.into();
        debug_assert!(from.can_transition_to(to), "illegal transition {from} -> {to}");

        info!(
            candidate_id = %candidate.candidate_id,
            cluster = %candidate.cluster_key,
            %from,
            %to,
            reason = %reason,
            "pattern lifecycle transition"
        );
        candidate.record_transition(to, at, reason);
    }

    fn log_wrong_state(&self, candidate: &PatternCandidate, operation: &str) {
        debug!(
            candidate_id = %candidate.candidate_id,
            state = %candidate.state,
            operation,
            "operation not applicable in current state"
        );
    }
}
