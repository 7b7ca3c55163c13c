//! Event-log replay driver.
//!
//! Reads a JSON-lines log of pattern events and drives one candidate per
//! cluster key through the reducer, strictly in file order. The replay
//! clock is set to each event's timestamp before the event is applied, so
//! replaying the same log always yields the same candidate states.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{FindingFixPair, LifecycleConfig, PatternCandidate, PatternClusterKey};
use crate::domain::ports::ManualClock;
use crate::services::pattern_reducer::{PatternCandidateReducer, TickInputs};

/// One line of a replay log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// A new confirmed finding/fix pair for the cluster
    Ingest {
        at: DateTime<Utc>,
        cluster: PatternClusterKey,
        pair: FindingFixPair,
    },
    /// A previously ingested fix was reverted
    Reintroduced {
        at: DateTime<Utc>,
        cluster: PatternClusterKey,
        pair_id: String,
    },
    /// Advance the cluster's lifecycle by one step
    Tick {
        at: DateTime<Utc>,
        cluster: PatternClusterKey,
        #[serde(default = "default_true")]
        acceptance_passed: bool,
        #[serde(default = "default_true")]
        replay_clean: bool,
        #[serde(default)]
        recurrence_observed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_versions: Option<HashMap<String, String>>,
    },
    /// Retire the cluster's pattern
    Deprecate {
        at: DateTime<Utc>,
        cluster: PatternClusterKey,
        reason: String,
    },
}

const fn default_true() -> bool {
    true
}

impl ReplayEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Ingest { at, .. }
            | Self::Reintroduced { at, .. }
            | Self::Tick { at, .. }
            | Self::Deprecate { at, .. } => *at,
        }
    }

    pub fn cluster(&self) -> &PatternClusterKey {
        match self {
            Self::Ingest { cluster, .. }
            | Self::Reintroduced { cluster, .. }
            | Self::Tick { cluster, .. }
            | Self::Deprecate { cluster, .. } => cluster,
        }
    }
}

/// Counters for a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Events applied to a candidate
    pub applied: usize,
    /// Events skipped because their cluster had no candidate yet
    pub skipped: usize,
}

/// Owns one candidate per cluster and feeds events to the reducer.
#[derive(Debug)]
pub struct PatternReplay {
    reducer: PatternCandidateReducer,
    clock: Arc<ManualClock>,
    candidates: BTreeMap<PatternClusterKey, PatternCandidate>,
    stats: ReplayStats,
}

impl PatternReplay {
    pub fn new(config: LifecycleConfig) -> Self {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
        Self {
            reducer: PatternCandidateReducer::with_clock(config, clock.clone()),
            clock,
            candidates: BTreeMap::new(),
            stats: ReplayStats::default(),
        }
    }

    /// Apply a single event.
    ///
    /// Only ingesting an unconfirmed pair fails. Events other than `ingest`
    /// for a cluster with no candidate are skipped.
    pub fn apply(&mut self, event: ReplayEvent) -> DomainResult<()> {
        self.clock.set(event.at());

        if let ReplayEvent::Ingest { cluster, pair, .. } = event {
            match self.candidates.get_mut(&cluster) {
                Some(candidate) => self.reducer.ingest_pair(candidate, pair, None)?,
                None => {
                    let candidate = self.reducer.new_candidate(cluster.clone(), Some(pair))?;
                    self.candidates.insert(cluster, candidate);
                }
            }
            self.stats.applied += 1;
            return Ok(());
        }

        let Some(candidate) = self.candidates.get_mut(event.cluster()) else {
            warn!(cluster = %event.cluster(), "event for unknown cluster skipped");
            self.stats.skipped += 1;
            return Ok(());
        };

        match event {
            ReplayEvent::Reintroduced { pair_id, .. } => {
                self.reducer.mark_reintroduced(candidate, pair_id);
            }
            ReplayEvent::Tick {
                acceptance_passed,
                replay_clean,
                recurrence_observed,
                tool_versions,
                ..
            } => {
                let inputs = TickInputs {
                    acceptance_passed,
                    replay_clean,
                    recurrence_observed,
                    tool_version_map: tool_versions.as_ref(),
                };
                self.reducer.tick(candidate, &inputs);
            }
            ReplayEvent::Deprecate { reason, .. } => {
                self.reducer.deprecate(candidate, &reason);
            }
            ReplayEvent::Ingest { .. } => unreachable!("ingest handled above"),
        }
        self.stats.applied += 1;
        Ok(())
    }

    /// Replay every event from a JSON-lines reader. Blank lines are ignored.
    pub fn replay_reader(&mut self, reader: impl BufRead) -> Result<ReplayStats> {
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                continue;
            }

            let event: ReplayEvent = serde_json::from_str(&line)
                .with_context(|| format!("Invalid replay event on line {line_no}"))?;
            self.apply(event)
                .with_context(|| format!("Replay aborted on line {line_no}"))?;
        }

        info!(
            applied = self.stats.applied,
            skipped = self.stats.skipped,
            candidates = self.candidates.len(),
            "replay finished"
        );
        Ok(self.stats)
    }

    /// Replay a JSON-lines log file.
    pub fn replay_file(&mut self, path: impl AsRef<Path>) -> Result<ReplayStats> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open replay log {}", path.display()))?;
        self.replay_reader(std::io::BufReader::new(file))
    }

    pub fn candidate(&self, cluster: &PatternClusterKey) -> Option<&PatternCandidate> {
        self.candidates.get(cluster)
    }

    /// Candidates ordered by cluster key.
    pub fn candidates(&self) -> impl Iterator<Item = &PatternCandidate> {
        self.candidates.values()
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    pub fn into_candidates(self) -> Vec<PatternCandidate> {
        self.candidates.into_values().collect()
    }
}
