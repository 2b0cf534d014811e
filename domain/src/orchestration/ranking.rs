//! Response ranking for best-of selection.
//!
//! Used by the `best_of_three` strategy and by fallback selection
//! downstream: a weighted score over confidence, length, latency, finish
//! reason, and on-domain vocabulary.

use crate::orchestration::value_objects::AgentResult;
use crate::session::response::FinishReason;
use crate::util::clamp_unit;

/// Score one response in [0, 1].
pub fn response_score(result: &AgentResult) -> f64 {
    let mut score = result.confidence * 0.4;

    // Length bonus: substantive answers beat one-liners.
    if result.content.len() > 100 {
        score += 0.1;
    }
    if result.content.len() > 500 {
        score += 0.1;
    }

    // Latency bonus.
    if result.execution_time_ms < 5_000 {
        score += 0.1;
    } else if result.execution_time_ms > 30_000 {
        score -= 0.1;
    }

    match result.metadata.finish_reason {
        Some(FinishReason::Stop) => score += 0.1,
        Some(FinishReason::Length) => score -= 0.05,
        _ => {}
    }

    // On-domain vocabulary for the result's own specialization.
    let lower = result.content.to_lowercase();
    if result
        .specialization
        .domain_keywords()
        .iter()
        .any(|k| lower.contains(k))
    {
        score += 0.1;
    }

    clamp_unit(score)
}

/// Pick the best-scoring result; ties break toward input order.
pub fn rank_best(results: &[AgentResult]) -> Option<&AgentResult> {
    let mut best: Option<(&AgentResult, f64)> = None;
    for result in results {
        let score = response_score(result);
        match best {
            // Strictly greater so the first max wins.
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((result, score)),
        }
    }
    best.map(|(r, _)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::specialization::AgentSpecialization;
    use crate::core::provider::Provider;
    use crate::orchestration::value_objects::ResultMetadata;
    use crate::session::response::TokenUsage;

    fn result(
        specialization: AgentSpecialization,
        content: &str,
        confidence: f64,
        elapsed_ms: u64,
        finish_reason: FinishReason,
    ) -> AgentResult {
        AgentResult::new(
            specialization,
            content,
            confidence,
            elapsed_ms,
            TokenUsage::new(10, 10),
            ResultMetadata {
                model: "m".to_string(),
                provider: Provider::OpenAi,
                temperature: 0.5,
                finish_reason: Some(finish_reason),
            },
        )
    }

    #[test]
    fn test_score_components() {
        // confidence 1.0 (0.4) + fast (0.1) + stop (0.1) = 0.6, no
        // length or keyword bonus on a short neutral string.
        let r = result(
            AgentSpecialization::Creative,
            "short",
            1.0,
            100,
            FinishReason::Stop,
        );
        assert!((response_score(&r) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_slow_responses_are_penalized() {
        let fast = result(
            AgentSpecialization::Creative,
            "short",
            0.5,
            1_000,
            FinishReason::Stop,
        );
        let slow = result(
            AgentSpecialization::Creative,
            "short",
            0.5,
            31_000,
            FinishReason::Stop,
        );
        assert!(response_score(&fast) > response_score(&slow));
        // fast: 0.2 + 0.1 + 0.1 = 0.4; slow: 0.2 - 0.1 + 0.1 = 0.2
        assert!((response_score(&slow) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_length_and_keyword_bonuses() {
        let body = "analysis ".repeat(70); // >500 chars, on-domain keyword
        let r = result(
            AgentSpecialization::Analytical,
            &body,
            0.5,
            1_000,
            FinishReason::Stop,
        );
        // 0.2 + 0.1 + 0.1 (length) + 0.1 (latency) + 0.1 (stop) + 0.1 (keyword)
        assert!((response_score(&r) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_rank_best_picks_max() {
        let results = vec![
            result(AgentSpecialization::Analytical, "weak", 0.2, 100, FinishReason::Length),
            result(AgentSpecialization::Creative, "strong", 0.9, 100, FinishReason::Stop),
        ];
        let best = rank_best(&results).unwrap();
        assert_eq!(best.specialization, AgentSpecialization::Creative);
    }

    #[test]
    fn test_ties_break_toward_input_order() {
        let a = result(AgentSpecialization::Analytical, "same", 0.5, 100, FinishReason::Stop);
        let b = result(AgentSpecialization::Factual, "same", 0.5, 100, FinishReason::Stop);
        assert!((response_score(&a) - response_score(&b)).abs() < 1e-9);

        let results = [a, b];
        let best = rank_best(&results).unwrap();
        assert_eq!(best.specialization, AgentSpecialization::Analytical);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_best(&[]).is_none());
    }
}
