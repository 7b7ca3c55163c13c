//! Confirmed finding/fix correlations produced by the upstream pairing stage.

use serde::{Deserialize, Serialize};

/// A finding matched to the change that resolved it.
///
/// Consumed read-only by the reducer. Only pairs whose finding no longer
/// reproduces after the fix (`disappearance_confirmed`) may be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingFixPair {
    /// Unique identifier of the pairing
    pub pair_id: String,
    /// The finding that was fixed
    pub finding_id: String,
    /// Diff hunks of the fix, in order
    #[serde(default)]
    pub diff_hunks: Vec<String>,
    /// The finding no longer reproduces post-fix
    pub disappearance_confirmed: bool,
}

impl FindingFixPair {
    /// Create a confirmed pair.
    pub fn confirmed(
        pair_id: impl Into<String>,
        finding_id: impl Into<String>,
        diff_hunks: Vec<String>,
    ) -> Self {
        Self {
            pair_id: pair_id.into(),
            finding_id: finding_id.into(),
            diff_hunks,
            disappearance_confirmed: true,
        }
    }

    /// All hunks joined into a single diff body.
    pub fn joined_diff(&self) -> String {
        self.diff_hunks.join("\n")
    }
}
