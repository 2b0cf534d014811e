//! Response shape validation per specialization.
//!
//! Each specialization has its own notion of a well-formed answer; the
//! rules are a closed lookup table keyed by [`AgentSpecialization`].

use crate::agent::specialization::AgentSpecialization;

const STRUCTURE_MARKERS: [&str; 6] = ["- ", "* ", "1.", "2.", "therefore", "analysis"];
const IMAGINATIVE_MARKERS: [&str; 6] = [
    "imagine",
    "metaphor",
    "like a",
    "as if",
    "story",
    "picture this",
];
const HEDGING_MARKERS: [&str; 5] = ["might", "maybe", "possibly", "could be", "i think"];
const CITATION_MARKERS: [&str; 6] = [
    "according to",
    "source",
    "study",
    "research",
    "et al",
    "http",
];

/// Validate a response's shape for the given specialization.
///
/// The generic base check rejects empty text and short "Error:"-prefixed
/// strings; the per-kind check then enforces the specialization's
/// expectations.
pub fn validate_response(specialization: AgentSpecialization, content: &str) -> bool {
    if !base_check(content) {
        return false;
    }
    let lower = content.to_lowercase();
    match specialization {
        AgentSpecialization::Analytical => {
            // Expect evidence of structure: bullets, numbering, or
            // explicit reasoning vocabulary.
            STRUCTURE_MARKERS.iter().any(|m| lower.contains(m))
        }
        AgentSpecialization::Creative => {
            // Imaginative language, or enough length to carry an idea.
            content.len() > 200 || IMAGINATIVE_MARKERS.iter().any(|m| lower.contains(m))
        }
        AgentSpecialization::Factual => {
            // Hedging is only acceptable alongside citation-style markers.
            let hedged = HEDGING_MARKERS.iter().any(|m| lower.contains(m));
            let cited = CITATION_MARKERS.iter().any(|m| lower.contains(m));
            !hedged || cited
        }
    }
}

fn base_check(content: &str) -> bool {
    if content.trim().is_empty() {
        return false;
    }
    // A bare error string is not a response.
    if content.starts_with("Error:") && content.len() < 100 {
        return false;
    }
    true
}
