//! Self-assessed confidence heuristic.
//!
//! Confidence is computed from a fixed rule set, not learned: a base
//! score adjusted by finish reason, length, hedging/assertive language,
//! and a per-specialization keyword bonus. The per-kind rules live in one
//! match table so the set stays closed and testable in isolation.

use crate::agent::specialization::AgentSpecialization;
use crate::session::response::FinishReason;
use crate::util::clamp_unit;

const HEDGING_MARKERS: [&str; 3] = ["i think", "maybe", "possibly"];
const ASSERTIVE_MARKERS: [&str; 3] = ["definitely", "certainly", "clearly"];
const FACTUAL_PENALTY_MARKERS: [&str; 2] = ["might", "could be"];

/// Score a response's confidence in [0, 1].
pub fn confidence_score(
    specialization: AgentSpecialization,
    content: &str,
    finish_reason: Option<&FinishReason>,
) -> f64 {
    let lower = content.to_lowercase();
    let mut score: f64 = 0.7;

    match finish_reason {
        Some(FinishReason::Stop) => score += 0.2,
        Some(FinishReason::Length) => score -= 0.1,
        Some(FinishReason::ContentFilter) => score -= 0.3,
        _ => {}
    }

    if content.len() > 100 {
        score += 0.1;
    }
    if contains_any(&lower, &HEDGING_MARKERS) {
        score -= 0.1;
    }
    if contains_any(&lower, &ASSERTIVE_MARKERS) {
        score += 0.1;
    }

    score += specialization_bonus(specialization, &lower);

    clamp_unit(score)
}

/// Per-specialization bonus for on-domain language.
fn specialization_bonus(specialization: AgentSpecialization, lower: &str) -> f64 {
    let mut bonus = 0.0;
    if contains_any(lower, specialization.domain_keywords()) {
        bonus += 0.1;
    }
    // Factual agents lose confidence for speculation.
    if specialization == AgentSpecialization::Factual
        && contains_any(lower, &FACTUAL_PENALTY_MARKERS)
    {
        bonus -= 0.1;
    }
    bonus
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
