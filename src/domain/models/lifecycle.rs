//! Pattern lifecycle state model.
//!
//! Candidates move forward through a fixed sequence of states. The only
//! backwards-looking edge is the fast-path to `Deprecated`, which every
//! non-terminal state may take.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a pattern candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternLifecycleState {
    /// Accumulating confirmed pairs, gates not yet passed
    Candidate,
    /// All promotion gates passed, awaiting acceptance and replay checks
    Validated,
    /// Cleared acceptance and replay, serving as a trusted pattern
    Promoted,
    /// Promoted for a full window with no reintroductions
    Stable,
    /// Stable but no longer recurring; score is decaying
    Decaying,
    /// Terminal. Retired from use.
    Deprecated,
}

impl PatternLifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Validated => "validated",
            Self::Promoted => "promoted",
            Self::Stable => "stable",
            Self::Decaying => "decaying",
            Self::Deprecated => "deprecated",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "candidate" => Some(Self::Candidate),
            "validated" => Some(Self::Validated),
            "promoted" => Some(Self::Promoted),
            "stable" => Some(Self::Stable),
            "decaying" => Some(Self::Decaying),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }

    /// Check if this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deprecated)
    }

    /// Whether the decay model applies in this state.
    pub fn is_decay_eligible(&self) -> bool {
        matches!(self, Self::Stable | Self::Decaying)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(&self) -> Vec<PatternLifecycleState> {
        match self {
            Self::Candidate => vec![Self::Validated, Self::Deprecated],
            Self::Validated => vec![Self::Promoted, Self::Deprecated],
            Self::Promoted => vec![Self::Stable, Self::Deprecated],
            Self::Stable => vec![Self::Decaying, Self::Deprecated],
            Self::Decaying => vec![Self::Deprecated],
            Self::Deprecated => vec![],
        }
    }

    pub fn can_transition_to(&self, new_state: Self) -> bool {
        self.valid_transitions().contains(&new_state)
    }
}

impl fmt::Display for PatternLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}
