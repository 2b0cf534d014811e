//! Execution configuration: which agents run, how, and how the
//! orchestrator blends their output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::config::AgentConfig;
use crate::agent::specialization::AgentSpecialization;
use crate::core::error::ConfigError;
use crate::core::provider::Provider;
use crate::execution::mode::ExecutionMode;
use crate::orchestration::strategy::BlendingStrategy;

pub const MIN_TIMEOUT_MS: u64 = 1_000;
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Model settings for the orchestrator's own blending call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub model: String,
    pub provider: Provider,
    pub temperature: f64,
    pub max_tokens: u32,
    pub blending_strategy: BlendingStrategy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            provider: Provider::OpenAi,
            temperature: 0.5,
            max_tokens: 3072,
            blending_strategy: BlendingStrategy::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        if !(1..=4096).contains(&self.max_tokens) {
            return Err(ConfigError::MaxTokensOutOfRange(self.max_tokens));
        }
        Ok(())
    }
}

/// Complete configuration for one execution.
///
/// Invariant: `agents` covers exactly the three specializations, even for
/// agents with `enabled = false`. Immutable once an execution starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    pub agents: HashMap<AgentSpecialization, AgentConfig>,
    pub orchestrator: OrchestratorConfig,
    /// Per-agent timeout, in [1000, 300000] milliseconds.
    pub timeout_ms: u64,
    /// When every agent fails, retry once with the highest-weighted agent.
    pub fallback_to_single_agent: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            agents: AgentSpecialization::ALL
                .into_iter()
                .map(|s| (s, AgentConfig::default_for(s)))
                .collect(),
            orchestrator: OrchestratorConfig::default(),
            timeout_ms: 60_000,
            fallback_to_single_agent: true,
        }
    }
}

impl ExecutionConfig {
    /// Validate every invariant: the three-specialization cover, each
    /// agent config's ranges, the orchestrator's ranges, and the timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in AgentSpecialization::ALL {
            let config = self
                .agents
                .get(&spec)
                .ok_or_else(|| ConfigError::MissingSpecialization(spec.to_string()))?;
            config.validate()?;
        }
        self.orchestrator.validate()?;
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::TimeoutOutOfRange(self.timeout_ms));
        }
        Ok(())
    }

    /// Enabled agent configs in registration order.
    pub fn enabled_agents(&self) -> Vec<&AgentConfig> {
        AgentSpecialization::ALL
            .iter()
            .filter_map(|s| self.agents.get(s))
            .filter(|c| c.enabled)
            .collect()
    }

    /// The enabled agent with the numerically highest weight; ties break
    /// toward registration order. Used for fallback selection.
    pub fn highest_weight_agent(&self) -> Option<&AgentConfig> {
        let mut best: Option<&AgentConfig> = None;
        for config in self.enabled_agents() {
            match best {
                Some(b) if config.weight <= b.weight => {}
                _ => best = Some(config),
            }
        }
        best
    }

    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_blending_strategy(mut self, strategy: BlendingStrategy) -> Self {
        self.orchestrator.blending_strategy = strategy;
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback_to_single_agent = false;
        self
    }

    /// Replace one agent's config; the specialization key follows the
    /// config's own specialization field.
    pub fn with_agent(mut self, config: AgentConfig) -> Self {
        self.agents.insert(config.specialization, config);
        self
    }
}
