//! Diff similarity engine.
//!
//! Pure functions comparing the shape of fixes:
//! - Diff normalization (markers and whitespace removed)
//! - Normalized Levenshtein similarity between two diffs
//! - Mean pairwise similarity across a cluster of fixes

use crate::domain::models::FindingFixPair;

/// Inputs longer than this many characters are truncated before comparison.
pub const MAX_COMPARE_CHARS: usize = 2000;

/// Normalize a diff so that only the shape of the change remains.
///
/// Leading `+`/`-` markers and surrounding whitespace are stripped from each
/// line, blank lines are dropped, and the rest is rejoined with `\n`.
pub fn normalize_diff(diff: &str) -> String {
    diff.lines()
        .map(|line| line.trim().trim_start_matches(['+', '-']).trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalized edit similarity in `[0.0, 1.0]`.
///
/// `1.0 - levenshtein(a, b) / max(len(a), len(b))`, with identical inputs
/// (including two empty strings) scoring `1.0` and exactly one empty input
/// scoring `0.0`. Symmetric in its arguments.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().take(MAX_COMPARE_CHARS).collect();
    let b: Vec<char> = b.chars().take(MAX_COMPARE_CHARS).collect();

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein(&a, &b);
    let longest = a.len().max(b.len());
    1.0 - distance as f64 / longest as f64
}

/// Unit-cost edit distance, two-row dynamic programming.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Mean pairwise similarity of the normalized diffs in a cluster.
///
/// A cluster of zero or one pair is trivially convergent and scores `1.0`.
pub fn transform_similarity(pairs: &[FindingFixPair]) -> f64 {
    if pairs.len() <= 1 {
        return 1.0;
    }

    let normalized: Vec<String> = pairs
        .iter()
        .map(|pair| normalize_diff(&pair.joined_diff()))
        .collect();

    let mut total = 0.0;
    let mut comparisons = 0usize;
    for (i, left) in normalized.iter().enumerate() {
        for right in &normalized[i + 1..] {
            total += edit_similarity(left, right);
            comparisons += 1;
        }
    }

    total / comparisons as f64
}
