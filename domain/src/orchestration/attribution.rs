//! Per-agent attribution for the final blended answer.
//!
//! Contribution is estimated from confidence, vocabulary uniqueness among
//! the surviving responses, and word-set similarity to the final text.
//! Key insights are representative sentences lifted from each response.

use std::collections::{HashMap, HashSet};

use crate::agent::specialization::AgentSpecialization;
use crate::orchestration::value_objects::{AgentAttribution, AgentResult};
use crate::util::clamp_unit;

const INSIGHT_MARKERS: [&str; 5] = ["important", "key", "crucial", "significant", "notable"];
const MAX_INSIGHTS: usize = 3;
const MIN_INSIGHT_LEN: usize = 20;

/// Compute the attribution map for the surviving results.
pub fn attribute(
    results: &[AgentResult],
    final_text: &str,
) -> HashMap<AgentSpecialization, AgentAttribution> {
    let word_sets: Vec<HashSet<String>> =
        results.iter().map(|r| word_set(&r.content)).collect();
    let final_words = word_set(final_text);

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let uniqueness = uniqueness(&word_sets, i);
            let similarity = jaccard(&word_sets[i], &final_words);
            let contribution =
                clamp_unit(0.6 * result.confidence + 0.3 * uniqueness + 0.1 * similarity);
            let insights = key_insights(result);
            (
                result.specialization,
                AgentAttribution::new(contribution, insights),
            )
        })
        .collect()
}

/// Fraction of this result's words not found in any other result.
fn uniqueness(word_sets: &[HashSet<String>], index: usize) -> f64 {
    let own = &word_sets[index];
    if own.is_empty() {
        return 0.0;
    }
    let others: HashSet<&String> = word_sets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .flat_map(|(_, set)| set.iter())
        .collect();
    let unique = own.iter().filter(|w| !others.contains(w)).count();
    unique as f64 / own.len() as f64
}

/// Jaccard index between two word sets.
fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Lowercase word set of a text, stripped of punctuation.
fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Up to three sentences that read like load-bearing statements:
/// marker vocabulary, "This ..."/"The main ..." openers, or the result's
/// own domain keywords.
fn key_insights(result: &AgentResult) -> Vec<String> {
    let keywords = result.specialization.domain_keywords();
    result
        .content
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > MIN_INSIGHT_LEN)
        .filter(|s| {
            let lower = s.to_lowercase();
            INSIGHT_MARKERS.iter().any(|m| lower.contains(m))
                || s.starts_with("This")
                || s.starts_with("The main")
                || keywords.iter().any(|k| lower.contains(k))
        })
        .take(MAX_INSIGHTS)
        .map(str::to_string)
        .collect()
}
