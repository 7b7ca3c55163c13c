//! Outcome of a promotion gate evaluation pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The promotion gates, in evaluation order.
///
/// `WrongState` is not a gate; it reports a validation attempt made outside
/// the `Candidate` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionGate {
    MinOccurrences,
    DisappearanceConfirmed,
    TransformConvergence,
    ReintroductionRate,
    ToolVersionStability,
    WrongState,
}

impl PromotionGate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinOccurrences => "min_occurrences",
            Self::DisappearanceConfirmed => "disappearance_confirmed",
            Self::TransformConvergence => "transform_convergence",
            Self::ReintroductionRate => "reintroduction_rate",
            Self::ToolVersionStability => "tool_version_stability",
            Self::WrongState => "wrong_state",
        }
    }
}

impl fmt::Display for PromotionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic result of evaluating the promotion gates.
///
/// Metrics that were not reached before a short-circuit stay at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionGateResult {
    /// Whether every gate passed
    pub passed: bool,
    /// First failing gate, `None` when passed
    pub failed_gate: Option<PromotionGate>,
    /// Human-readable explanation of the failure, empty when passed
    pub gate_detail: String,
    /// Confirmed pairs counted by the first gate
    pub occurrence_count: usize,
    /// Mean pairwise transform similarity
    pub similarity_score: f64,
    /// Share of pairs whose fix was reverted
    pub reintroduction_rate: f64,
    /// Share of pairs produced by the majority tool version
    pub tool_version_stability: f64,
}

impl PromotionGateResult {
    pub(crate) fn failed(gate: PromotionGate, detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            failed_gate: Some(gate),
            gate_detail: detail.into(),
            occurrence_count: 0,
            similarity_score: 0.0,
            reintroduction_rate: 0.0,
            tool_version_stability: 0.0,
        }
    }

    /// Name of the first failing gate, or `""` when every gate passed.
    pub fn gate_name(&self) -> &'static str {
        self.failed_gate.as_ref().map_or("", PromotionGate::as_str)
    }
}
