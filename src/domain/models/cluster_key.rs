//! Clustering identity for pattern candidates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder used when AST context is unavailable.
pub const UNKNOWN_NODE_TYPE: &str = "unknown";

/// Identity of a cluster of findings assumed to share a structural cause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternClusterKey {
    /// Analyzer rule that raised the findings
    pub rule_id: String,
    /// AST node type of the finding
    #[serde(default = "unknown")]
    pub node_type: String,
    /// AST node type of the finding's parent
    #[serde(default = "unknown")]
    pub parent_node_type: String,
}

fn unknown() -> String {
    UNKNOWN_NODE_TYPE.to_string()
}

impl PatternClusterKey {
    pub fn new(
        rule_id: impl Into<String>,
        node_type: impl Into<String>,
        parent_node_type: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            node_type: node_type.into(),
            parent_node_type: parent_node_type.into(),
        }
    }

    /// Key for a rule with no AST context.
    pub fn for_rule(rule_id: impl Into<String>) -> Self {
        Self::new(rule_id, UNKNOWN_NODE_TYPE, UNKNOWN_NODE_TYPE)
    }
}

impl fmt::Display for PatternClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.rule_id, self.node_type, self.parent_node_type)
    }
}

impl FromStr for PatternClusterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|');
        let rule_id = parts.next().unwrap_or_default().trim();
        if rule_id.is_empty() {
            return Err(format!("cluster key '{s}' has an empty rule id"));
        }
        let node_type = parts.next().map_or(UNKNOWN_NODE_TYPE, str::trim);
        let parent_node_type = parts.next().map_or(UNKNOWN_NODE_TYPE, str::trim);
        Ok(Self::new(rule_id, node_type, parent_node_type))
    }
}
