//! Orchestration value objects - immutable result types for one execution.
//!
//! These types carry the outputs of an execution run:
//! - [`AgentResult`] - one agent's answer with confidence and usage
//! - [`AgentAttribution`] - how much one agent contributed to the final text
//! - [`CompositeResult`] - the full bundled outcome with metadata

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::specialization::AgentSpecialization;
use crate::core::provider::Provider;
use crate::execution::mode::ExecutionMode;
use crate::orchestration::strategy::BlendingStrategy;
use crate::session::response::{FinishReason, TokenUsage};
use crate::util::clamp_unit;

/// Provenance metadata recorded alongside a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub model: String,
    pub provider: Provider,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// Response from a single agent invocation.
///
/// Immutable after creation. Confidence adjustments (conflict resolution)
/// derive a new value via [`AgentResult::with_confidence`] instead of
/// mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    /// The specialization that produced this response.
    pub specialization: AgentSpecialization,
    /// The response content. Error-shaped results carry "Error: ...".
    pub content: String,
    /// Self-assessed confidence, always in [0, 1].
    pub confidence: f64,
    /// Wall-clock time of the invocation.
    pub execution_time_ms: u64,
    /// Token usage reported by the provider.
    pub token_usage: TokenUsage,
    /// Provenance of the call.
    pub metadata: ResultMetadata,
}

impl AgentResult {
    pub fn new(
        specialization: AgentSpecialization,
        content: impl Into<String>,
        confidence: f64,
        execution_time_ms: u64,
        token_usage: TokenUsage,
        metadata: ResultMetadata,
    ) -> Self {
        Self {
            specialization,
            content: content.into(),
            confidence: clamp_unit(confidence),
            execution_time_ms,
            token_usage,
            metadata,
        }
    }

    /// Error-shaped result for a failed invocation.
    ///
    /// Keeps the result type uniform: confidence 0, "Error: ..." content,
    /// and an `error` finish reason mark it as excluded from blending.
    pub fn failure(
        specialization: AgentSpecialization,
        error: impl std::fmt::Display,
        execution_time_ms: u64,
        mut metadata: ResultMetadata,
    ) -> Self {
        metadata.finish_reason = Some(FinishReason::Error);
        Self {
            specialization,
            content: format!("Error: {error}"),
            confidence: 0.0,
            execution_time_ms,
            token_usage: TokenUsage::default(),
            metadata,
        }
    }

    /// Derive a copy with an adjusted confidence, clamped to [0, 1].
    pub fn with_confidence(&self, confidence: f64) -> Self {
        Self {
            confidence: clamp_unit(confidence),
            ..self.clone()
        }
    }

    /// Whether this result represents a failed invocation.
    pub fn is_error(&self) -> bool {
        self.content.starts_with("Error:")
            || matches!(self.metadata.finish_reason, Some(FinishReason::Error))
    }

    /// Whether this result survives the blending pre-filter:
    /// non-empty, not error-shaped, confidence above the floor.
    pub fn is_blendable(&self) -> bool {
        !self.content.trim().is_empty() && !self.is_error() && self.confidence > 0.1
    }
}

/// Per-agent contribution estimate for the final blended answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAttribution {
    /// Estimated share of the final answer, in [0, 1].
    pub contribution_percentage: f64,
    /// Up to three representative sentences from the agent's response.
    pub key_insights: Vec<String>,
}

impl AgentAttribution {
    pub fn new(contribution_percentage: f64, key_insights: Vec<String>) -> Self {
        Self {
            contribution_percentage: clamp_unit(contribution_percentage),
            key_insights,
        }
    }

    /// Attribution for a lone fallback responder: full credit.
    pub fn sole_contributor(note: impl Into<String>) -> Self {
        Self {
            contribution_percentage: 1.0,
            key_insights: vec![note.into()],
        }
    }
}

/// Metadata about how an execution ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMeta {
    pub blending_strategy: BlendingStrategy,
    pub execution_mode: ExecutionMode,
    pub total_execution_time_ms: u64,
    pub token_usage: TokenUsage,
}

/// The final bundled output of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// The blended answer returned to the caller.
    pub final_response: String,
    /// The surviving agent results that fed the blend. Always non-empty;
    /// exactly one entry when the fallback path was taken.
    pub agent_results: Vec<AgentResult>,
    pub meta: ExecutionMeta,
    pub attribution: HashMap<AgentSpecialization, AgentAttribution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ResultMetadata {
        ResultMetadata {
            model: "gpt-4o".to_string(),
            provider: Provider::OpenAi,
            temperature: 0.3,
            finish_reason: Some(FinishReason::Stop),
        }
    }

    #[test]
    fn test_new_clamps_confidence() {
        let result = AgentResult::new(
            AgentSpecialization::Analytical,
            "fine",
            1.4,
            100,
            TokenUsage::new(10, 10),
            metadata(),
        );
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_failure_shape() {
        let result = AgentResult::failure(
            AgentSpecialization::Factual,
            "connection refused",
            50,
            metadata(),
        );
        assert_eq!(result.content, "Error: connection refused");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.metadata.finish_reason, Some(FinishReason::Error));
        assert!(result.is_error());
        assert!(!result.is_blendable());
    }

    #[test]
    fn test_with_confidence_derives_new_value() {
        let result = AgentResult::new(
            AgentSpecialization::Creative,
            "a story",
            0.8,
            100,
            TokenUsage::default(),
            metadata(),
        );
        let adjusted = result.with_confidence(-0.2);
        assert_eq!(adjusted.confidence, 0.0);
        assert_eq!(result.confidence, 0.8); // original untouched
        assert_eq!(adjusted.content, result.content);
    }

    #[test]
    fn test_blendable_floor() {
        let base = AgentResult::new(
            AgentSpecialization::Analytical,
            "content",
            0.1,
            10,
            TokenUsage::default(),
            metadata(),
        );
        assert!(!base.is_blendable()); // exactly 0.1 is dropped
        assert!(base.with_confidence(0.11).is_blendable());
    }

    #[test]
    fn test_sole_contributor_attribution() {
        let attribution = AgentAttribution::sole_contributor("fallback");
        assert_eq!(attribution.contribution_percentage, 1.0);
        assert_eq!(attribution.key_insights.len(), 1);
    }
}
