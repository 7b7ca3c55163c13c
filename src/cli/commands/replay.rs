//! Replay CLI command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, PatternCandidate, PatternLifecycleState};
use crate::services::replay::{PatternReplay, ReplayStats};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines event log
    pub log: PathBuf,

    /// Only show candidates in this lifecycle state
    #[arg(short, long)]
    pub state: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct CandidateRow {
    pub candidate_id: String,
    pub cluster: String,
    pub state: String,
    pub pattern_score: f64,
    pub pairs: usize,
    pub reintroduced: usize,
    pub oscillations: u32,
    pub transitions: usize,
}

impl From<&PatternCandidate> for CandidateRow {
    fn from(candidate: &PatternCandidate) -> Self {
        Self {
            candidate_id: candidate.candidate_id.to_string(),
            cluster: candidate.cluster_key.to_string(),
            state: candidate.state.to_string(),
            pattern_score: candidate.pattern_score,
            pairs: candidate.confirmed_pairs.len(),
            reintroduced: candidate.reintroduced_pair_ids.len(),
            oscillations: candidate.oscillation_count,
            transitions: candidate.state_history.len(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ReplayOutput {
    pub stats: ReplayStats,
    #[serde(skip)]
    pub rows: Vec<CandidateRow>,
    pub candidates: Vec<PatternCandidate>,
}

impl CommandOutput for ReplayOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&[
            "cluster",
            "state",
            "score",
            "pairs",
            "reintroduced",
            "oscillations",
            "transitions",
        ]);
        for row in &self.rows {
            table.add_row(vec![
                truncate(&row.cluster, 48),
                row.state.clone(),
                format!("{:.4}", row.pattern_score),
                row.pairs.to_string(),
                row.reintroduced.to_string(),
                row.oscillations.to_string(),
                row.transitions.to_string(),
            ]);
        }

        format!(
            "{}\n\n{} event(s) applied, {} skipped",
            render_list("candidate", &table, self.rows.len()),
            self.stats.applied,
            self.stats.skipped
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Replay `args.log` and collect the resulting candidates.
pub fn run(args: &ReplayArgs, config: &Config) -> Result<ReplayOutput> {
    let state_filter = match &args.state {
        Some(name) => Some(
            PatternLifecycleState::from_str(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown lifecycle state: {name}"))?,
        ),
        None => None,
    };

    let mut replay = PatternReplay::new(config.lifecycle.clone());
    let stats = replay.replay_file(&args.log)?;

    let candidates: Vec<PatternCandidate> = replay
        .into_candidates()
        .into_iter()
        .filter(|candidate| state_filter.is_none_or(|state| candidate.state == state))
        .collect();

    Ok(ReplayOutput {
        stats,
        rows: candidates.iter().map(CandidateRow::from).collect(),
        candidates,
    })
}

pub fn execute(args: &ReplayArgs, config: &Config, json_mode: bool) -> Result<()> {
    let result = run(args, config)?;
    output(&result, json_mode);
    Ok(())
}
