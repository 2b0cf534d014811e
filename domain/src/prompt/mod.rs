//! Prompt templates for the blending strategies.

use crate::orchestration::value_objects::AgentResult;

/// Templates for the orchestrator's blending call.
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for any blending call.
    pub fn orchestrator_system() -> &'static str {
        r#"You are the orchestrator of a three-agent council (analytical, creative, factual).
Your task is to merge their responses into one coherent answer for the user.
Preserve correct information, resolve disagreements in favor of better-supported claims,
and write in a single consistent voice. Do not mention the agents or this process."#
    }

    /// Weighted merge: combine responses proportionally to confidence.
    pub fn weighted_merge(question: &str, results: &[AgentResult]) -> String {
        let mut prompt = format!(
            r#"Original question: {question}

Merge the following specialist responses into one answer. Give each response
influence proportional to its confidence score; higher-confidence content
should dominate where responses overlap or disagree.

Responses:
"#
        );
        Self::push_labeled_responses(&mut prompt, results);
        prompt.push_str("\nWrite the merged answer now.");
        prompt
    }

    /// Synthesis: write a fresh answer informed by all responses.
    pub fn synthesis(question: &str, results: &[AgentResult]) -> String {
        let mut prompt = format!(
            r#"Original question: {question}

Three specialists answered the question independently. Synthesize a new,
complete answer of your own that draws on the strongest elements of each:
the analytical structure, the creative framing, and the factual grounding.

Responses:
"#
        );
        Self::push_labeled_responses(&mut prompt, results);
        prompt.push_str("\nWrite the synthesized answer now.");
        prompt
    }

    /// Hierarchical: refine the top-ranked response using the others.
    pub fn hierarchical(question: &str, primary: &AgentResult, others: &[AgentResult]) -> String {
        let mut prompt = format!(
            r#"Original question: {question}

The primary response below was judged strongest. Refine it, correcting or
enriching it with material from the supplementary responses where they add
value. Keep the primary response's structure and voice.

--- primary ({}, confidence {:.2}) ---
{}
"#,
            primary.specialization, primary.confidence, primary.content
        );
        if !others.is_empty() {
            prompt.push_str("\nSupplementary responses:\n");
            Self::push_labeled_responses(&mut prompt, others);
        }
        prompt.push_str("\nWrite the refined answer now.");
        prompt
    }

    fn push_labeled_responses(prompt: &mut String, results: &[AgentResult]) {
        for result in results {
            prompt.push_str(&format!(
                "\n--- {} (confidence {:.2}) ---\n{}\n",
                result.specialization, result.confidence, result.content
            ));
        }
    }

    /// Key-insight note attached to a fallback result's attribution.
    pub fn fallback_insight() -> &'static str {
        "Sole response: produced by single-agent fallback after all agents failed"
    }
}
