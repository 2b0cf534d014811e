//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Agent sections are patch-shaped: any omitted field falls back to that
//! specialization's built-in default.
//!
//! Example configuration:
//!
//! ```toml
//! [execution]
//! mode = "parallel"
//! timeout_ms = 60000
//! fallback_to_single_agent = true
//!
//! [orchestrator]
//! model = "gpt-4o"
//! provider = "openai"
//! blending_strategy = "weighted_merge"
//!
//! [agents.analytical]
//! model = "gpt-4o"
//! weight = 0.4
//!
//! [agents.creative]
//! temperature = 0.95
//!
//! [agents.factual]
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};
use trinity_domain::{
    AgentConfig, AgentConfigPatch, AgentSpecialization, ConfigError, ExecutionConfig,
    OrchestratorConfig, Provider,
};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scheduling settings
    pub execution: FileExecutionConfig,
    /// Blending settings
    pub orchestrator: FileOrchestratorConfig,
    /// Per-specialization agent overrides
    pub agents: FileAgentsConfig,
}

impl FileConfig {
    /// Convert the raw file structure into a validated [`ExecutionConfig`].
    pub fn into_execution_config(self) -> Result<ExecutionConfig, ConfigError> {
        let mut config = ExecutionConfig::default()
            .with_mode(self.execution.mode.parse()?)
            .with_timeout_ms(self.execution.timeout_ms);
        if !self.execution.fallback_to_single_agent {
            config = config.without_fallback();
        }

        config.orchestrator = OrchestratorConfig {
            model: self.orchestrator.model,
            provider: parse_provider(&self.orchestrator.provider),
            temperature: self.orchestrator.temperature,
            max_tokens: self.orchestrator.max_tokens,
            blending_strategy: self.orchestrator.blending_strategy.parse()?,
        };

        for (spec, overrides) in [
            (AgentSpecialization::Analytical, self.agents.analytical),
            (AgentSpecialization::Creative, self.agents.creative),
            (AgentSpecialization::Factual, self.agents.factual),
        ] {
            let base = AgentConfig::default_for(spec);
            config = config.with_agent(overrides.into_patch().apply(&base));
        }

        config.validate()?;
        Ok(config)
    }
}

/// `[execution]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Scheduling mode: "parallel", "sequential", or "hybrid"
    pub mode: String,
    /// Per-agent timeout in milliseconds
    pub timeout_ms: u64,
    /// Retry with the highest-weighted agent when all agents fail
    pub fallback_to_single_agent: bool,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let base = ExecutionConfig::default();
        Self {
            mode: base.mode.as_str().to_string(),
            timeout_ms: base.timeout_ms,
            fallback_to_single_agent: base.fallback_to_single_agent,
        }
    }
}

/// `[orchestrator]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub model: String,
    pub provider: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Blending strategy: "weighted_merge", "best_of_three", "synthesis",
    /// or "hierarchical"
    pub blending_strategy: String,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let base = OrchestratorConfig::default();
        Self {
            model: base.model,
            provider: base.provider.as_str().to_string(),
            temperature: base.temperature,
            max_tokens: base.max_tokens,
            blending_strategy: base.blending_strategy.as_str().to_string(),
        }
    }
}

/// `[agents]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub analytical: FileAgentConfig,
    pub creative: FileAgentConfig,
    pub factual: FileAgentConfig,
}

/// One `[agents.*]` section: overrides applied on top of the
/// specialization's built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub model: Option<String>,
    pub provider: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub weight: Option<f64>,
    pub enabled: Option<bool>,
}

impl FileAgentConfig {
    fn into_patch(self) -> AgentConfigPatch {
        AgentConfigPatch {
            model: self.model,
            provider: self.provider.as_deref().map(parse_provider),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt: self.system_prompt,
            weight: self.weight,
            enabled: self.enabled,
        }
    }
}

fn parse_provider(s: &str) -> Provider {
    match s.parse() {
        Ok(provider) => provider,
        Err(infallible) => match infallible {},
    }
}
