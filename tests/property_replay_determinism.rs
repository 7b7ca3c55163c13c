//! Replaying the same event log must always produce the same lifecycle.

use chrono::{Duration, TimeZone, Utc};
use patterns::domain::models::{FindingFixPair, LifecycleConfig, PatternClusterKey, PatternLifecycleState};
use patterns::services::{PatternReplay, ReplayEvent};
use proptest::prelude::*;

const FIXES: [&str; 3] = [
    "- if (a == b) {\n+ if (a === b) {",
    "- if (x == y) {\n+ if (x === y) {",
    "- let v = opt.unwrap();\n+ let v = opt?;",
];

#[derive(Debug, Clone)]
enum Op {
    Ingest { rule: u8, fix: usize },
    Reintroduce { rule: u8, pair: u8 },
    Tick { rule: u8, days: i64, accept: bool, recur: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..3, 0usize..FIXES.len()).prop_map(|(rule, fix)| Op::Ingest { rule, fix }),
        1 => (0u8..3, 0u8..8).prop_map(|(rule, pair)| Op::Reintroduce { rule, pair }),
        5 => (0u8..3, 0i64..40, prop::bool::weighted(0.9), any::<bool>())
            .prop_map(|(rule, days, accept, recur)| Op::Tick { rule, days, accept, recur }),
    ]
}

fn to_events(ops: &[Op]) -> Vec<ReplayEvent> {
    let mut at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let mut events = Vec::with_capacity(ops.len());

    for (i, op) in ops.iter().enumerate() {
        let event = match op {
            Op::Ingest { rule, fix } => ReplayEvent::Ingest {
                at,
                cluster: PatternClusterKey::for_rule(format!("rule-{rule}")),
                pair: FindingFixPair::confirmed(
                    format!("pair-{}", i % 8),
                    format!("finding-{i}"),
                    vec![FIXES[*fix].to_string()],
                ),
            },
            Op::Reintroduce { rule, pair } => ReplayEvent::Reintroduced {
                at,
                cluster: PatternClusterKey::for_rule(format!("rule-{rule}")),
                pair_id: format!("pair-{pair}"),
            },
            Op::Tick { rule, days, accept, recur } => {
                at += Duration::days(*days);
                ReplayEvent::Tick {
                    at,
                    cluster: PatternClusterKey::for_rule(format!("rule-{rule}")),
                    acceptance_passed: *accept,
                    replay_clean: true,
                    recurrence_observed: *recur,
                    tool_versions: None,
                }
            }
        };
        events.push(event);
    }

    events
}

type Fingerprint = (PatternLifecycleState, f64, Option<String>, usize, u32);

fn replay(events: &[ReplayEvent]) -> Vec<(PatternClusterKey, Fingerprint)> {
    let mut replay = PatternReplay::new(LifecycleConfig::default());
    for event in events {
        replay.apply(event.clone()).unwrap();
    }
    replay
        .candidates()
        .map(|c| {
            (
                c.cluster_key.clone(),
                (
                    c.state,
                    c.pattern_score,
                    c.transform_signature.clone(),
                    c.state_history.len(),
                    c.oscillation_count,
                ),
            )
        })
        .collect()
}

proptest! {
    /// Property: Two replays of one log agree on every candidate
    #[test]
    fn prop_replay_is_deterministic(ops in prop::collection::vec(op(), 0..60)) {
        let events = to_events(&ops);
        prop_assert_eq!(replay(&events), replay(&events));
    }

    /// Property: A JSON-lines round trip replays identically
    #[test]
    fn prop_serialized_log_replays_identically(ops in prop::collection::vec(op(), 0..40)) {
        let events = to_events(&ops);
        let log: String = events
            .iter()
            .map(|e| serde_json::to_string(e).unwrap() + "\n")
            .collect();

        let mut from_log = PatternReplay::new(LifecycleConfig::default());
        from_log.replay_reader(log.as_bytes()).unwrap();
        let mut direct = PatternReplay::new(LifecycleConfig::default());
        for event in events {
            direct.apply(event).unwrap();
        }

        let left: Vec<_> = from_log.candidates().map(|c| (c.state, c.state_history.clone())).collect();
        let right: Vec<_> = direct.candidates().map(|c| (c.state, c.state_history.clone())).collect();
        prop_assert_eq!(left, right);
    }

    /// Property: Lifecycle invariants hold after any event sequence
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 0..80)) {
        let events = to_events(&ops);
        let mut replay = PatternReplay::new(LifecycleConfig::default());
        for event in events {
            replay.apply(event).unwrap();
        }

        for candidate in replay.candidates() {
            prop_assert!(candidate.pattern_score > 0.0 && candidate.pattern_score <= 1.0);
            prop_assert_eq!(candidate.state_history.first().map(|t| t.state), Some(PatternLifecycleState::Candidate));
            prop_assert_eq!(candidate.state_history.last().map(|t| t.state), Some(candidate.state));
            prop_assert!(candidate.confirmed_pairs.iter().all(|p| p.disappearance_confirmed));
            prop_assert_eq!(candidate.deprecated_at.is_some(), candidate.is_deprecated());
            for window in candidate.state_history.windows(2) {
                prop_assert!(window[0].state.can_transition_to(window[1].state));
                prop_assert!(window[0].at <= window[1].at);
            }
            if candidate.state >= PatternLifecycleState::Validated {
                prop_assert!(candidate.validated_at.is_some() || candidate.is_deprecated());
            }
        }
    }
}
