//! Run Trinity use case
//!
//! The execution manager: runs the enabled agents in the configured mode
//! (parallel, sequential, or hybrid), absorbs individual failures, falls
//! back to the highest-weighted agent when everyone fails, and hands the
//! survivors to the orchestrator for blending.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};
use trinity_domain::{
    latest_user_content, AgentAttribution, AgentResult, AgentSpecialization, CompositeResult,
    ConfigError, ExecutionConfig, ExecutionMeta, ExecutionMode, Message, PromptTemplate,
    Provider, TokenUsage,
};

use crate::agent::{AgentContext, SpecializedAgent};
use crate::orchestrator::{BlendOutcome, Orchestrator, OrchestratorError};
use crate::ports::credentials::{CredentialError, CredentialStore};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{ExecutionPhase, NoProgress, ProgressNotifier};
use crate::registry::AgentRegistry;

/// Delay between consecutive agent launches in concurrent modes.
///
/// Mitigates provider rate limits; not a correctness requirement.
pub const STAGGER_INTERVAL: Duration = Duration::from_millis(500);

/// Errors that can surface from a Trinity execution.
///
/// Individual agent failures never appear here; they are absorbed and
/// logged. Only precondition violations and manager-level exhaustion
/// conditions propagate.
#[derive(Error, Debug)]
pub enum TrinityError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("No enabled agents")]
    NoEnabledAgents,

    #[error("Missing credential for provider: {0}")]
    MissingCredential(Provider),

    /// Sequential strict mode only: the first agent error aborts the run.
    #[error("Agent '{specialization}' failed: {message}")]
    AgentFailed {
        specialization: AgentSpecialization,
        message: String,
    },

    #[error("All agents failed to respond")]
    AllAgentsFailed,

    #[error("Fallback agent failed: {0}")]
    FallbackExhausted(String),

    #[error("No valid responses to blend")]
    NoValidResponses,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl From<OrchestratorError> for TrinityError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::NoValidResponses => TrinityError::NoValidResponses,
            OrchestratorError::Blend(g) => TrinityError::Gateway(g),
        }
    }
}

/// Input for one Trinity execution.
#[derive(Debug, Clone)]
pub struct RunTrinityInput {
    /// The prompt history; the last user message is the question.
    pub history: Vec<Message>,
    /// Execution configuration, immutable for the duration of the run.
    pub config: ExecutionConfig,
    /// Whose credentials to resolve.
    pub user_id: String,
}

impl RunTrinityInput {
    pub fn new(
        history: Vec<Message>,
        config: ExecutionConfig,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            history,
            config,
            user_id: user_id.into(),
        }
    }

    /// The question being answered: the most recent user message.
    pub fn question(&self) -> &str {
        latest_user_content(&self.history).unwrap_or("")
    }
}

/// Use case for running one Trinity execution.
pub struct RunTrinityUseCase<G> {
    gateway: Arc<G>,
    credentials: Arc<dyn CredentialStore>,
}

impl<G: LlmGateway + 'static> RunTrinityUseCase<G> {
    pub fn new(gateway: Arc<G>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    /// Execute with default (no-op) progress.
    pub async fn execute(&self, input: RunTrinityInput) -> Result<CompositeResult, TrinityError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: RunTrinityInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CompositeResult, TrinityError> {
        input.config.validate()?;

        // Registry is scoped to this request; no cross-request bleed.
        let mut registry = AgentRegistry::new(Arc::clone(&self.gateway));
        let agents = registry.resolve(&input.config);
        if agents.is_empty() {
            return Err(TrinityError::NoEnabledAgents);
        }

        let keys = self.resolve_credentials(&input, &agents).await?;
        let started = Instant::now();

        info!(
            mode = %input.config.mode,
            agents = agents.len(),
            "starting trinity execution"
        );
        progress.on_phase_start(&ExecutionPhase::Agents, agents.len());

        let results = match input.config.mode {
            ExecutionMode::Parallel => {
                self.run_concurrent(&agents, &input, &keys, &[], progress)
                    .await
            }
            ExecutionMode::Sequential => {
                self.run_sequential(&agents, &input, &keys, progress).await?
            }
            ExecutionMode::Hybrid => self.run_hybrid(&agents, &input, &keys, progress).await,
        };
        progress.on_phase_complete(&ExecutionPhase::Agents);

        let successes: Vec<AgentResult> =
            results.into_iter().filter(|r| !r.is_error()).collect();

        if successes.is_empty() {
            if input.config.fallback_to_single_agent {
                return self
                    .run_fallback(&agents, &input, &keys, started, progress)
                    .await;
            }
            return Err(TrinityError::AllAgentsFailed);
        }

        info!(successes = successes.len(), "agents done, blending");
        progress.on_phase_start(&ExecutionPhase::Blending, 1);

        let orchestrator =
            Orchestrator::new(input.config.orchestrator.clone(), Arc::clone(&self.gateway));
        let orchestrator_key = keys
            .get(&input.config.orchestrator.provider)
            .cloned()
            .unwrap_or_default();
        let outcome = orchestrator
            .orchestrate(successes, input.question(), &orchestrator_key)
            .await?;

        progress.on_phase_complete(&ExecutionPhase::Blending);
        Ok(compose(outcome, &input.config, started))
    }

    async fn resolve_credentials(
        &self,
        input: &RunTrinityInput,
        agents: &[SpecializedAgent<G>],
    ) -> Result<HashMap<Provider, String>, TrinityError> {
        resolve_credentials(self.credentials.as_ref(), input, agents).await
    }

    /// Settle-all concurrent execution with staggered starts.
    ///
    /// Used by parallel mode and by hybrid phase 1. Each launch races the
    /// configured timeout; a lost race drops the in-flight future, so the
    /// provider call is actually cancelled, and the agent contributes
    /// nothing.
    async fn run_concurrent(
        &self,
        agents: &[SpecializedAgent<G>],
        input: &RunTrinityInput,
        keys: &HashMap<Provider, String>,
        prior: &[AgentResult],
        progress: &dyn ProgressNotifier,
    ) -> Vec<AgentResult> {
        let history = Arc::new(input.history.clone());
        let prior = Arc::new(prior.to_vec());
        let timeout_ms = input.config.timeout_ms;
        let mut join_set = JoinSet::new();

        for (index, agent) in agents.iter().cloned().enumerate() {
            let history = Arc::clone(&history);
            let prior = Arc::clone(&prior);
            let api_key = keys.get(&agent.config().provider).cloned().unwrap_or_default();
            let stagger = STAGGER_INTERVAL * index as u32;

            join_set.spawn(async move {
                sleep(stagger).await;
                let ctx = AgentContext::new(&api_key, &prior);
                let outcome = timeout(
                    Duration::from_millis(timeout_ms),
                    agent.invoke(&history, &ctx),
                )
                .await;
                (agent.specialization(), outcome)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((spec, Ok(result))) => {
                    debug!(specialization = %spec, error = result.is_error(), "agent settled");
                    progress.on_agent_complete(&spec, !result.is_error());
                    results.push(result);
                }
                Ok((spec, Err(_elapsed))) => {
                    warn!(specialization = %spec, timeout_ms, "agent timed out");
                    progress.on_agent_complete(&spec, false);
                }
                Err(e) => {
                    warn!("task join error: {e}");
                }
            }
        }
        results
    }

    /// One agent at a time in registration order, each seeing the prior
    /// successes. Failures are skipped; in strict mode (fallback
    /// disabled) the first failure aborts the whole run.
    async fn run_sequential(
        &self,
        agents: &[SpecializedAgent<G>],
        input: &RunTrinityInput,
        keys: &HashMap<Provider, String>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<AgentResult>, TrinityError> {
        let timeout_ms = input.config.timeout_ms;
        let mut successes: Vec<AgentResult> = Vec::new();

        for agent in agents {
            let spec = agent.specialization();
            let api_key = keys.get(&agent.config().provider).cloned().unwrap_or_default();
            let ctx = AgentContext::new(&api_key, &successes);

            let outcome = timeout(
                Duration::from_millis(timeout_ms),
                agent.invoke(&input.history, &ctx),
            )
            .await;

            let failure: String = match outcome {
                Ok(result) if !result.is_error() => {
                    progress.on_agent_complete(&spec, true);
                    successes.push(result);
                    continue;
                }
                Ok(result) => result.content,
                Err(_elapsed) => format!("timed out after {timeout_ms}ms"),
            };

            progress.on_agent_complete(&spec, false);
            if !input.config.fallback_to_single_agent {
                // Strict mode: no fallback means no tolerance either.
                return Err(TrinityError::AgentFailed {
                    specialization: spec,
                    message: failure,
                });
            }
            warn!(specialization = %spec, "sequential agent failed, skipping");
        }

        Ok(successes)
    }

    /// Phase 1: factual + analytical concurrently. Phase 2: creative,
    /// with phase-1 successes as context; its failure is non-fatal.
    async fn run_hybrid(
        &self,
        agents: &[SpecializedAgent<G>],
        input: &RunTrinityInput,
        keys: &HashMap<Provider, String>,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AgentResult> {
        let phase1: Vec<SpecializedAgent<G>> = agents
            .iter()
            .filter(|a| a.specialization() != AgentSpecialization::Creative)
            .cloned()
            .collect();

        let mut results = self
            .run_concurrent(&phase1, input, keys, &[], progress)
            .await;

        let Some(creative) = agents
            .iter()
            .find(|a| a.specialization() == AgentSpecialization::Creative)
        else {
            return results;
        };

        // Context holds phase-1 successes only, never a phase-2 result.
        let phase1_successes: Vec<AgentResult> =
            results.iter().filter(|r| !r.is_error()).cloned().collect();
        let api_key = keys
            .get(&creative.config().provider)
            .cloned()
            .unwrap_or_default();
        let ctx = AgentContext::new(&api_key, &phase1_successes);

        match timeout(
            Duration::from_millis(input.config.timeout_ms),
            creative.invoke(&input.history, &ctx),
        )
        .await
        {
            Ok(result) => {
                progress.on_agent_complete(&AgentSpecialization::Creative, !result.is_error());
                results.push(result);
            }
            Err(_elapsed) => {
                // Non-fatal: proceed with phase-1 results alone.
                warn!("creative agent timed out in hybrid phase 2");
                progress.on_agent_complete(&AgentSpecialization::Creative, false);
            }
        }
        results
    }

    /// All agents failed: one more attempt with the highest-weighted
    /// enabled agent, alone and with full credit.
    async fn run_fallback(
        &self,
        agents: &[SpecializedAgent<G>],
        input: &RunTrinityInput,
        keys: &HashMap<Provider, String>,
        started: Instant,
        progress: &dyn ProgressNotifier,
    ) -> Result<CompositeResult, TrinityError> {
        let Some(chosen) = input.config.highest_weight_agent() else {
            return Err(TrinityError::NoEnabledAgents);
        };
        let Some(agent) = agents
            .iter()
            .find(|a| a.specialization() == chosen.specialization)
        else {
            return Err(TrinityError::NoEnabledAgents);
        };

        warn!(
            specialization = %chosen.specialization,
            weight = chosen.weight,
            "all agents failed, falling back to single agent"
        );
        progress.on_phase_start(&ExecutionPhase::Fallback, 1);

        let api_key = keys.get(&chosen.provider).cloned().unwrap_or_default();
        let ctx = AgentContext::new(&api_key, &[]);
        let outcome = timeout(
            Duration::from_millis(input.config.timeout_ms),
            agent.invoke(&input.history, &ctx),
        )
        .await;

        let result = match outcome {
            Ok(result) if !result.is_error() => result,
            Ok(result) => return Err(TrinityError::FallbackExhausted(result.content)),
            Err(_elapsed) => {
                return Err(TrinityError::FallbackExhausted(format!(
                    "fallback agent timed out after {}ms",
                    input.config.timeout_ms
                )));
            }
        };

        progress.on_agent_complete(&result.specialization, true);
        progress.on_phase_complete(&ExecutionPhase::Fallback);

        let attribution = HashMap::from([(
            result.specialization,
            AgentAttribution::sole_contributor(PromptTemplate::fallback_insight()),
        )]);

        Ok(CompositeResult {
            final_response: result.content.clone(),
            meta: ExecutionMeta {
                blending_strategy: input.config.orchestrator.blending_strategy,
                execution_mode: input.config.mode,
                total_execution_time_ms: started.elapsed().as_millis() as u64,
                token_usage: result.token_usage,
            },
            agent_results: vec![result],
            attribution,
        })
    }
}

/// Resolve every enabled provider's credential (plus the orchestrator's)
/// before any call is made. Missing keys fail fast.
pub(crate) async fn resolve_credentials<G: LlmGateway>(
    credentials: &dyn CredentialStore,
    input: &RunTrinityInput,
    agents: &[SpecializedAgent<G>],
) -> Result<HashMap<Provider, String>, TrinityError> {
    let mut providers: Vec<Provider> = agents
        .iter()
        .map(|a| a.config().provider.clone())
        .collect();
    providers.push(input.config.orchestrator.provider.clone());
    providers.dedup();

    let mut keys = HashMap::new();
    for provider in providers {
        if keys.contains_key(&provider) {
            continue;
        }
        match credentials.resolve(&input.user_id, &provider).await? {
            Some(key) => {
                keys.insert(provider, key);
            }
            None => return Err(TrinityError::MissingCredential(provider)),
        }
    }
    Ok(keys)
}

/// Assemble the composite result from a blend outcome.
pub(crate) fn compose(
    outcome: BlendOutcome,
    config: &ExecutionConfig,
    started: Instant,
) -> CompositeResult {
    let token_usage = TokenUsage::sum(outcome.survivors.iter().map(|r| &r.token_usage));
    CompositeResult {
        final_response: outcome.final_response,
        meta: ExecutionMeta {
            blending_strategy: config.orchestrator.blending_strategy,
            execution_mode: config.mode,
            total_execution_time_ms: started.elapsed().as_millis() as u64,
            token_usage,
        },
        agent_results: outcome.survivors,
        attribution: outcome.attribution,
    }
}
