//! Per-agent configuration.
//!
//! [`AgentConfig`] is immutable once handed to an execution; runtime
//! changes go through [`AgentConfigPatch::apply`], which derives a new
//! effective config rather than mutating the one in flight.

use serde::{Deserialize, Serialize};

use crate::agent::specialization::AgentSpecialization;
use crate::core::error::ConfigError;
use crate::core::provider::Provider;

/// Configuration for one specialized agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Which specialization this config drives.
    pub specialization: AgentSpecialization,
    /// Model identifier, opaque to the engine (e.g. "gpt-4o").
    pub model: String,
    /// Provider the model is served by.
    pub provider: Provider,
    /// Sampling temperature, in [0.0, 2.0].
    pub temperature: f64,
    /// Completion token budget, in [1, 4096].
    pub max_tokens: u32,
    /// System prompt prepended to every invocation.
    pub system_prompt: String,
    /// Blending weight, in [0.0, 1.0]. Weights need not sum to 1.
    pub weight: f64,
    /// Disabled agents are skipped but their config entry must still exist.
    pub enabled: bool,
}

impl AgentConfig {
    /// Default config for a specialization: conventional provider/model
    /// pairing and a temperature matched to the kind of output wanted.
    pub fn default_for(specialization: AgentSpecialization) -> Self {
        let (model, provider, temperature, weight) = match specialization {
            AgentSpecialization::Analytical => ("gpt-4o", Provider::OpenAi, 0.3, 0.4),
            AgentSpecialization::Creative => ("claude-sonnet-4-5", Provider::Anthropic, 0.9, 0.3),
            AgentSpecialization::Factual => ("gemini-2.5-pro", Provider::Google, 0.2, 0.3),
        };
        Self {
            specialization,
            model: model.to_string(),
            provider,
            temperature,
            max_tokens: 2048,
            system_prompt: specialization.default_system_prompt().to_string(),
            weight,
            enabled: true,
        }
    }

    /// Validate all range invariants.
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
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(ConfigError::WeightOutOfRange(self.weight));
        }
        Ok(())
    }

    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Partial update to an [`AgentConfig`].
///
/// `None` fields leave the current value untouched. The specialization
/// itself is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigPatch {
    pub model: Option<String>,
    pub provider: Option<Provider>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub weight: Option<f64>,
    pub enabled: Option<bool>,
}

impl AgentConfigPatch {
    /// Derive a new config from `base` with this patch applied.
    pub fn apply(&self, base: &AgentConfig) -> AgentConfig {
        AgentConfig {
            specialization: base.specialization,
            model: self.model.clone().unwrap_or_else(|| base.model.clone()),
            provider: self.provider.clone().unwrap_or_else(|| base.provider.clone()),
            temperature: self.temperature.unwrap_or(base.temperature),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            system_prompt: self
                .system_prompt
                .clone()
                .unwrap_or_else(|| base.system_prompt.clone()),
            weight: self.weight.unwrap_or(base.weight),
            enabled: self.enabled.unwrap_or(base.enabled),
        }
    }
}
