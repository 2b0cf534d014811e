//! Pairwise contradiction detection between agent responses.
//!
//! Responses from different specializations are scanned for opposing
//! keyword pairs; each detected opposition costs the response a fixed
//! confidence penalty, floored so a contradicted response is demoted but
//! never driven below the pre-filter threshold's boundary.

use crate::orchestration::value_objects::AgentResult;

/// Keyword pairs treated as mutual contradictions.
const OPPOSING_PAIRS: [(&str, &str); 6] = [
    ("yes", "no"),
    ("true", "false"),
    ("increase", "decrease"),
    ("better", "worse"),
    ("should", "should not"),
    ("recommend", "not recommend"),
];

const CONFLICT_PENALTY: f64 = 0.15;
const CONFIDENCE_FLOOR: f64 = 0.1;

/// Derive conflict-adjusted copies of the given results.
///
/// For each result, every opposing pair detected against every other
/// result (of a different specialization) subtracts [`CONFLICT_PENALTY`]
/// from its confidence, floored at [`CONFIDENCE_FLOOR`]. Matching is plain
/// lowercase substring containment, mirroring the scoring heuristics.
pub fn resolve_conflicts(results: &[AgentResult]) -> Vec<AgentResult> {
    let lowered: Vec<String> = results.iter().map(|r| r.content.to_lowercase()).collect();

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let mut conflicts = 0usize;
            for (j, other) in results.iter().enumerate() {
                if i == j || other.specialization == result.specialization {
                    continue;
                }
                conflicts += count_oppositions(&lowered[i], &lowered[j]);
            }
            if conflicts == 0 {
                result.clone()
            } else {
                let adjusted = result.confidence - CONFLICT_PENALTY * conflicts as f64;
                result.with_confidence(adjusted.max(CONFIDENCE_FLOOR))
            }
        })
        .collect()
}

/// Number of opposing pairs where one side appears in `a` and the other
/// in `b`, in either direction.
fn count_oppositions(a: &str, b: &str) -> usize {
    OPPOSING_PAIRS
        .iter()
        .filter(|(left, right)| {
            (a.contains(left) && b.contains(right)) || (a.contains(right) && b.contains(left))
        })
        .count()
}
