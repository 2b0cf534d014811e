//! Response orchestrator: conflict resolution, blending, attribution.
//!
//! The orchestrator takes the agents' surviving results and produces the
//! final answer. Three of the four strategies issue one extra LLM call
//! through the orchestrator's own model and provider; `best_of_three`
//! picks a winner locally.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use trinity_domain::{
    attribute, rank_best, resolve_conflicts, AgentAttribution, AgentResult, AgentSpecialization,
    BlendingStrategy, Message, OrchestratorConfig, PromptTemplate,
};

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmRequest};

/// Errors from the blending stage.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The pre-filter removed every response.
    #[error("No valid responses to blend")]
    NoValidResponses,

    /// The orchestrator's own LLM call failed.
    #[error("Blending call failed: {0}")]
    Blend(#[from] GatewayError),
}

/// Outcome of one orchestration pass.
pub struct BlendOutcome {
    pub final_response: String,
    /// The post-filter results that fed the blend.
    pub survivors: Vec<AgentResult>,
    pub attribution: HashMap<AgentSpecialization, AgentAttribution>,
}

pub struct Orchestrator<G> {
    config: OrchestratorConfig,
    gateway: Arc<G>,
}

impl<G: LlmGateway> Orchestrator<G> {
    pub fn new(config: OrchestratorConfig, gateway: Arc<G>) -> Self {
        Self { config, gateway }
    }

    pub fn strategy(&self) -> BlendingStrategy {
        self.config.blending_strategy
    }

    /// Drop results that cannot participate in blending: empty content,
    /// error-shaped content, or confidence at/below the floor.
    pub fn prefilter(results: Vec<AgentResult>) -> Vec<AgentResult> {
        results.into_iter().filter(|r| r.is_blendable()).collect()
    }

    /// Full orchestration pass: conflicts, pre-filter, blend, attribution.
    pub async fn orchestrate(
        &self,
        results: Vec<AgentResult>,
        question: &str,
        api_key: &str,
    ) -> Result<BlendOutcome, OrchestratorError> {
        let adjusted = resolve_conflicts(&results);
        let survivors = Self::prefilter(adjusted);
        if survivors.is_empty() {
            return Err(OrchestratorError::NoValidResponses);
        }

        let final_response = self.blend(&survivors, question, api_key).await?;
        let attribution = attribute(&survivors, &final_response);

        Ok(BlendOutcome {
            final_response,
            survivors,
            attribution,
        })
    }

    /// Blend pre-filtered results into one answer.
    ///
    /// A single surviving result short-circuits: its content is returned
    /// verbatim with no LLM call, whatever the strategy.
    pub async fn blend(
        &self,
        survivors: &[AgentResult],
        question: &str,
        api_key: &str,
    ) -> Result<String, OrchestratorError> {
        if survivors.is_empty() {
            return Err(OrchestratorError::NoValidResponses);
        }
        if survivors.len() == 1 {
            debug!("single surviving response, skipping blend call");
            return Ok(survivors[0].content.clone());
        }

        let strategy = self.config.blending_strategy;
        info!(%strategy, responses = survivors.len(), "blending responses");

        let prompt = match strategy {
            BlendingStrategy::BestOfThree => {
                // Ranked selection, no extra call.
                let best =
                    rank_best(survivors).ok_or(OrchestratorError::NoValidResponses)?;
                return Ok(best.content.clone());
            }
            BlendingStrategy::WeightedMerge => {
                PromptTemplate::weighted_merge(question, survivors)
            }
            BlendingStrategy::Synthesis => PromptTemplate::synthesis(question, survivors),
            BlendingStrategy::Hierarchical => {
                let primary =
                    rank_best(survivors).ok_or(OrchestratorError::NoValidResponses)?;
                let others: Vec<AgentResult> = survivors
                    .iter()
                    .filter(|r| r.specialization != primary.specialization)
                    .cloned()
                    .collect();
                PromptTemplate::hierarchical(question, primary, &others)
            }
        };

        let response = self
            .gateway
            .invoke(LlmRequest {
                messages: vec![
                    Message::system(PromptTemplate::orchestrator_system()),
                    Message::user(prompt),
                ],
                model: self.config.model.clone(),
                provider: self.config.provider.clone(),
                api_key: api_key.to_string(),
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .await?;

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trinity_domain::{FinishReason, Provider, ResultMetadata, TokenUsage};

    use crate::ports::llm_gateway::LlmResponse;

    struct CountingGateway {
        calls: AtomicUsize,
    }

    impl CountingGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmGateway for CountingGateway {
        async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LlmResponse {
                content: format!("blended via {}", request.model),
                usage: TokenUsage::new(50, 100),
                finish_reason: FinishReason::Stop,
            })
        }
    }

    fn result(
        specialization: AgentSpecialization,
        content: &str,
        confidence: f64,
    ) -> AgentResult {
        AgentResult::new(
            specialization,
            content,
            confidence,
            100,
            TokenUsage::new(10, 10),
            ResultMetadata {
                model: "m".to_string(),
                provider: Provider::OpenAi,
                temperature: 0.5,
                finish_reason: Some(FinishReason::Stop),
            },
        )
    }

    fn orchestrator(gateway: Arc<CountingGateway>) -> Orchestrator<CountingGateway> {
        Orchestrator::new(OrchestratorConfig::default(), gateway)
    }

    #[test]
    fn test_prefilter_drops_invalid_results() {
        let results = vec![
            result(AgentSpecialization::Analytical, "good answer", 0.8),
            result(AgentSpecialization::Creative, "", 0.8),
            result(AgentSpecialization::Factual, "Error: boom", 0.8),
            result(AgentSpecialization::Factual, "low confidence", 0.1),
        ];
        let survivors = Orchestrator::<CountingGateway>::prefilter(results);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].content, "good answer");
    }

    #[tokio::test]
    async fn test_single_survivor_short_circuits_without_llm_call() {
        let gateway = CountingGateway::new();
        let orchestrator = orchestrator(Arc::clone(&gateway));

        let results = vec![
            result(AgentSpecialization::Analytical, "the only good answer", 0.8),
            result(AgentSpecialization::Creative, "Error: failed", 0.0),
        ];
        let outcome = orchestrator
            .orchestrate(results, "q", "key")
            .await
            .unwrap();

        assert_eq!(outcome.final_response, "the only good answer");
        assert_eq!(outcome.survivors.len(), 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_valid_responses() {
        let gateway = CountingGateway::new();
        let orchestrator = orchestrator(gateway);

        let results = vec![result(AgentSpecialization::Creative, "Error: nope", 0.0)];
        let outcome = orchestrator.orchestrate(results, "q", "key").await;
        assert!(matches!(outcome, Err(OrchestratorError::NoValidResponses)));
    }

    #[tokio::test]
    async fn test_weighted_merge_issues_one_call() {
        let gateway = CountingGateway::new();
        let orchestrator = orchestrator(Arc::clone(&gateway));

        let results = vec![
            result(AgentSpecialization::Analytical, "structured take", 0.8),
            result(AgentSpecialization::Creative, "vivid take", 0.7),
        ];
        let outcome = orchestrator
            .orchestrate(results, "q", "key")
            .await
            .unwrap();

        assert_eq!(outcome.final_response, "blended via gpt-4o");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.attribution.len(), 2);
    }

    #[tokio::test]
    async fn test_best_of_three_returns_winner_without_call() {
        let gateway = CountingGateway::new();
        let mut config = OrchestratorConfig::default();
        config.blending_strategy = BlendingStrategy::BestOfThree;
        let orchestrator = Orchestrator::new(config, Arc::clone(&gateway));

        let results = vec![
            result(AgentSpecialization::Analytical, "weak", 0.3),
            result(AgentSpecialization::Factual, "strong and sourced", 0.95),
        ];
        let outcome = orchestrator
            .orchestrate(results, "q", "key")
            .await
            .unwrap();

        assert_eq!(outcome.final_response, "strong and sourced");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conflicting_results_are_demoted_before_blending() {
        let gateway = CountingGateway::new();
        let orchestrator = orchestrator(gateway);

        // Three oppositions drop 0.45: the analytical result lands on the
        // 0.1 floor and is filtered out, leaving a single survivor.
        let results = vec![
            result(
                AgentSpecialization::Analytical,
                "yes, it will increase and get better",
                0.5,
            ),
            result(
                AgentSpecialization::Factual,
                "no, it will decrease and get worse",
                0.9,
            ),
        ];
        let outcome = orchestrator
            .orchestrate(results, "q", "key")
            .await
            .unwrap();

        assert_eq!(outcome.survivors.len(), 1);
        assert_eq!(
            outcome.survivors[0].specialization,
            AgentSpecialization::Factual
        );
        assert_eq!(
            outcome.final_response,
            "no, it will decrease and get worse"
        );
    }
}
