//! Promotion gate evaluation.
//!
//! Gates run in a fixed order and stop at the first failure:
//! 1. `min_occurrences`
//! 2. `disappearance_confirmed`
//! 3. `transform_convergence`
//! 4. `reintroduction_rate`
//! 5. `tool_version_stability`

use std::collections::HashMap;

use crate::domain::models::{
    LifecycleConfig, PatternCandidate, PromotionGate, PromotionGateResult,
};
use crate::services::similarity::transform_similarity;

/// Evaluate the promotion gates against a candidate.
///
/// Never fails; a failing gate is reported through the result. The
/// optional `tool_version_map` maps pair ids to the analyzer version that
/// produced them. Without it the tool-version gate passes.
pub fn evaluate_promotion_gates(
    candidate: &PatternCandidate,
    tool_version_map: Option<&HashMap<String, String>>,
    config: &LifecycleConfig,
) -> PromotionGateResult {
    let occurrence_count = candidate.occurrence_count();
    // At least one pair, so a validated candidate always has a signature.
    let required = config.min_occurrences.max(1);
    if occurrence_count < required {
        return PromotionGateResult {
            occurrence_count,
            ..PromotionGateResult::failed(
                PromotionGate::MinOccurrences,
                format!(
                    "{occurrence_count} confirmed pair(s), need at least {required}"
                ),
            )
        };
    }

    if let Some(pair) = candidate
        .confirmed_pairs
        .iter()
        .find(|pair| !pair.disappearance_confirmed)
    {
        return PromotionGateResult {
            occurrence_count,
            ..PromotionGateResult::failed(
                PromotionGate::DisappearanceConfirmed,
                format!("pair {} has no confirmed disappearance", pair.pair_id),
            )
        };
    }

    let similarity_score = transform_similarity(&candidate.confirmed_pairs);
    if similarity_score < config.transform_similarity_threshold {
        return PromotionGateResult {
            occurrence_count,
            similarity_score,
            ..PromotionGateResult::failed(
                PromotionGate::TransformConvergence,
                format!(
                    "transform similarity {similarity_score:.3} below {:.3}",
                    config.transform_similarity_threshold
                ),
            )
        };
    }

    let reintroduction_rate = candidate.reintroduction_rate();
    if reintroduction_rate >= config.max_reintroduction_rate {
        return PromotionGateResult {
            occurrence_count,
            similarity_score,
            reintroduction_rate,
            ..PromotionGateResult::failed(
                PromotionGate::ReintroductionRate,
                format!(
                    "reintroduction rate {reintroduction_rate:.3} not below {:.3}",
                    config.max_reintroduction_rate
                ),
            )
        };
    }

    let tool_version_stability = tool_version_map.map_or(1.0, majority_share);
    if tool_version_stability < config.tool_version_stability {
        return PromotionGateResult {
            occurrence_count,
            similarity_score,
            reintroduction_rate,
            tool_version_stability,
            ..PromotionGateResult::failed(
                PromotionGate::ToolVersionStability,
                format!(
                    "majority tool version covers {tool_version_stability:.3}, need {:.3}",
                    config.tool_version_stability
                ),
            )
        };
    }

    PromotionGateResult {
        passed: true,
        failed_gate: None,
        gate_detail: String::new(),
        occurrence_count,
        similarity_score,
        reintroduction_rate,
        tool_version_stability,
    }
}

/// Share of map entries carrying the most common version. Empty maps are
/// treated as fully stable.
fn majority_share(versions: &HashMap<String, String>) -> f64 {
    if versions.is_empty() {
        return 1.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for version in versions.values() {
        *counts.entry(version.as_str()).or_default() += 1;
    }
    let majority = counts.values().copied().max().unwrap_or_default();

    majority as f64 / versions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FindingFixPair, PatternClusterKey};
    use chrono::Utc;

    fn candidate_with(diffs: &[&str]) -> PatternCandidate {
        let mut candidate = PatternCandidate::new(PatternClusterKey::for_rule("eqeqeq"), Utc::now());
        for (i, diff) in diffs.iter().enumerate() {
            candidate.confirmed_pairs.push(FindingFixPair::confirmed(
                format!("p{i}"),
                format!("f{i}"),
                vec![(*diff).to_string()],
            ));
        }
        candidate
    }

    fn versions(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_all_gates_pass() {
        let candidate = candidate_with(&["- a == b\n+ a === b"; 3]);
        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());

        assert!(result.passed);
        assert_eq!(result.gate_name(), "");
        assert!(result.gate_detail.is_empty());
        assert_eq!(result.occurrence_count, 3);
        assert!((result.similarity_score - 1.0).abs() < f64::EPSILON);
        assert!((result.tool_version_stability - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_min_occurrences_checked_before_convergence() {
        // Two wildly different diffs would also fail convergence.
        let candidate = candidate_with(&["+ completely different", "- xyz"]);
        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());

        assert!(!result.passed);
        assert_eq!(result.gate_name(), "min_occurrences");
        assert_eq!(result.occurrence_count, 2);
        assert!(result.similarity_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_min_occurrences_requires_one_pair() {
        let config = LifecycleConfig {
            min_occurrences: 0,
            ..LifecycleConfig::default()
        };
        let result = evaluate_promotion_gates(&candidate_with(&[]), None, &config);

        assert_eq!(result.gate_name(), "min_occurrences");
        assert_eq!(result.gate_detail, "0 confirmed pair(s), need at least 1");
    }

    #[test]
    fn test_unconfirmed_pair_fails_second_gate() {
        let mut candidate = candidate_with(&["+ x"; 3]);
        candidate.confirmed_pairs[1].disappearance_confirmed = false;

        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());
        assert_eq!(result.failed_gate, Some(PromotionGate::DisappearanceConfirmed));
        assert!(result.gate_detail.contains("p1"));
    }

    #[test]
    fn test_divergent_transforms_fail_convergence() {
        let candidate = candidate_with(&["+ use strict equality", "- drop the import", "+ 42"]);
        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());

        assert_eq!(result.failed_gate, Some(PromotionGate::TransformConvergence));
        assert!(result.similarity_score < 0.85);
    }

    #[test]
    fn test_reintroduction_rate_is_strict() {
        let mut candidate = candidate_with(&["+ x"; 5]);
        candidate.reintroduced_pair_ids.insert("p0".to_string());

        // 1/5 == 0.20 is not strictly below 0.20
        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());
        assert_eq!(result.failed_gate, Some(PromotionGate::ReintroductionRate));
        assert!((result.reintroduction_rate - 0.2).abs() < 1e-12);

        candidate
            .confirmed_pairs
            .push(FindingFixPair::confirmed("p5", "f5", vec!["+ x".to_string()]));
        let result = evaluate_promotion_gates(&candidate, None, &LifecycleConfig::default());
        assert!(result.passed);
    }

    #[test]
    fn test_tool_version_majority_share() {
        let candidate = candidate_with(&["+ x"; 3]);
        let config = LifecycleConfig::default();

        let split = versions(&[("p0", "1.2"), ("p1", "1.3"), ("p2", "1.2")]);
        let result = evaluate_promotion_gates(&candidate, Some(&split), &config);
        assert_eq!(result.failed_gate, Some(PromotionGate::ToolVersionStability));
        assert!((result.tool_version_stability - 2.0 / 3.0).abs() < 1e-12);

        let steady = versions(&[
            ("p0", "1.2"),
            ("p1", "1.2"),
            ("p2", "1.2"),
            ("p3", "1.2"),
            ("p4", "1.3"),
        ]);
        let result = evaluate_promotion_gates(&candidate, Some(&steady), &config);
        assert!(result.passed);
        assert!((result.tool_version_stability - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_empty_version_map_passes() {
        let candidate = candidate_with(&["+ x"; 3]);
        let empty = HashMap::new();
        let result = evaluate_promotion_gates(&candidate, Some(&empty), &LifecycleConfig::default());
        assert!(result.passed);
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let candidate = candidate_with(&["+ x"; 2]);
        let config = LifecycleConfig {
            min_occurrences: 2,
            ..LifecycleConfig::default()
        };
        assert!(evaluate_promotion_gates(&candidate, None, &config).passed);
    }
}
