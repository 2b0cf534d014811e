//! One specialized agent: a model configuration bound to the gateway.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use trinity_domain::{
    confidence_score, validate_response, AgentConfig, AgentConfigPatch, AgentResult,
    AgentSpecialization, Message, ResultMetadata,
};

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmRequest, StreamHandle};

/// Runtime context handed to an agent for one invocation.
///
/// `prior_results` carries the successful results of earlier agents in
/// sequential and hybrid modes; it is empty in parallel mode.
#[derive(Clone, Copy)]
pub struct AgentContext<'a> {
    pub api_key: &'a str,
    pub prior_results: &'a [AgentResult],
}

impl<'a> AgentContext<'a> {
    pub fn new(api_key: &'a str, prior_results: &'a [AgentResult]) -> Self {
        Self {
            api_key,
            prior_results,
        }
    }
}

/// A single specialized responder.
///
/// Wraps one [`AgentConfig`] and the gateway; produces [`AgentResult`]s.
/// Failures are absorbed: a gateway error becomes an error-shaped result
/// with confidence 0, keeping the result type uniform for the scheduler.
pub struct SpecializedAgent<G> {
    config: AgentConfig,
    gateway: Arc<G>,
}

impl<G> Clone for SpecializedAgent<G> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: LlmGateway> SpecializedAgent<G> {
    pub fn new(config: AgentConfig, gateway: Arc<G>) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn specialization(&self) -> AgentSpecialization {
        self.config.specialization
    }

    /// Replace the agent's effective config (registry reuse path).
    pub fn set_config(&mut self, config: AgentConfig) {
        self.config = config;
    }

    /// Derive and adopt a new config from a partial update.
    pub fn update_config(&mut self, patch: &AgentConfigPatch) {
        self.config = patch.apply(&self.config);
    }

    /// Validate a response's shape for this agent's specialization.
    pub fn validate(&self, content: &str) -> bool {
        validate_response(self.config.specialization, content)
    }

    /// Invoke the agent once.
    ///
    /// Never returns an error: failures become error-shaped results the
    /// scheduler excludes from blending.
    pub async fn invoke(&self, history: &[Message], ctx: &AgentContext<'_>) -> AgentResult {
        let start = Instant::now();
        let request = self.build_request(history, ctx);
        debug!(
            specialization = %self.config.specialization,
            model = %self.config.model,
            "invoking agent"
        );

        match self.gateway.invoke(request).await {
            Ok(response) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let confidence = confidence_score(
                    self.config.specialization,
                    &response.content,
                    Some(&response.finish_reason),
                );
                AgentResult::new(
                    self.config.specialization,
                    response.content,
                    confidence,
                    elapsed_ms,
                    response.usage,
                    self.metadata(Some(response.finish_reason)),
                )
            }
            Err(e) => {
                warn!(
                    specialization = %self.config.specialization,
                    error = %e,
                    "agent invocation failed"
                );
                AgentResult::failure(
                    self.config.specialization,
                    e,
                    start.elapsed().as_millis() as u64,
                    self.metadata(None),
                )
            }
        }
    }

    /// Begin a streaming invocation.
    ///
    /// The returned stream is finite and not restartable; retrying means
    /// a fresh call.
    pub async fn stream(
        &self,
        history: &[Message],
        ctx: &AgentContext<'_>,
    ) -> Result<StreamHandle, GatewayError> {
        let request = self.build_request(history, ctx);
        self.gateway.invoke_streaming(request).await
    }

    /// Provenance metadata for results produced by this agent.
    pub fn metadata(
        &self,
        finish_reason: Option<trinity_domain::FinishReason>,
    ) -> ResultMetadata {
        ResultMetadata {
            model: self.config.model.clone(),
            provider: self.config.provider.clone(),
            temperature: self.config.temperature,
            finish_reason,
        }
    }

    fn build_request(&self, history: &[Message], ctx: &AgentContext<'_>) -> LlmRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.config.system_prompt.clone()));
        if !ctx.prior_results.is_empty() {
            messages.push(Message::system(prior_results_block(ctx.prior_results)));
        }
        messages.extend_from_slice(history);

        LlmRequest {
            messages,
            model: self.config.model.clone(),
            provider: self.config.provider.clone(),
            api_key: ctx.api_key.to_string(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

/// Context block summarizing earlier agents' successful responses.
fn prior_results_block(prior: &[AgentResult]) -> String {
    let mut block = String::from(
        "Responses already produced by other council members for this question:\n",
    );
    for result in prior {
        block.push_str(&format!(
            "\n--- {} (confidence {:.2}) ---\n{}\n",
            result.specialization, result.confidence, result.content
        ));
    }
    block.push_str("\nTake these into account without repeating them.");
    block
}
