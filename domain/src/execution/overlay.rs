//! Ordered partial-configuration overlay.
//!
//! Callers customize executions in layers: a named preset, then custom
//! agent models, then custom weights, then advanced overrides, then an
//! explicit execution mode. [`ConfigOverlay::resolve`] applies those
//! layers in one fixed precedence order so the rules stay verifiable
//! instead of being scattered across ad hoc merges.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::specialization::AgentSpecialization;
use crate::core::provider::Provider;
use crate::execution::config::ExecutionConfig;
use crate::execution::mode::ExecutionMode;
use crate::orchestration::strategy::BlendingStrategy;

/// Named base configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// The stock defaults.
    Balanced,
    /// Lower latency: shorter timeout, smaller budgets, no extra
    /// orchestrator call.
    Fast,
    /// Higher quality: synthesis blending, generous timeout and budgets.
    Thorough,
}

impl Preset {
    /// Materialize the preset's base [`ExecutionConfig`].
    pub fn base_config(&self) -> ExecutionConfig {
        match self {
            Preset::Balanced => ExecutionConfig::default(),
            Preset::Fast => {
                let mut config = ExecutionConfig::default()
                    .with_timeout_ms(15_000)
                    .with_blending_strategy(BlendingStrategy::BestOfThree);
                for agent in config.agents.values_mut() {
                    agent.max_tokens = 1024;
                }
                config
            }
            Preset::Thorough => {
                let mut config = ExecutionConfig::default()
                    .with_timeout_ms(120_000)
                    .with_blending_strategy(BlendingStrategy::Synthesis);
                for agent in config.agents.values_mut() {
                    agent.max_tokens = 4096;
                }
                config.orchestrator.max_tokens = 4096;
                config
            }
        }
    }
}

/// Per-agent model override for the second overlay layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOverride {
    pub model: Option<String>,
    pub provider: Option<Provider>,
}

/// Advanced overrides, applied after models and weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOverrides {
    pub timeout_ms: Option<u64>,
    pub fallback_to_single_agent: Option<bool>,
    pub blending_strategy: Option<BlendingStrategy>,
    pub orchestrator_model: Option<String>,
    pub orchestrator_provider: Option<Provider>,
}

/// The full overlay: every layer optional, precedence fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverlay {
    pub preset: Option<Preset>,
    #[serde(default)]
    pub models: HashMap<AgentSpecialization, ModelOverride>,
    #[serde(default)]
    pub weights: HashMap<AgentSpecialization, f64>,
    #[serde(default)]
    pub advanced: AdvancedOverrides,
    pub mode: Option<ExecutionMode>,
}

impl ConfigOverlay {
    /// Resolve the overlay into an effective config.
    ///
    /// Precedence, lowest to highest:
    /// 1. preset base (defaults when no preset is named)
    /// 2. per-agent model overrides
    /// 3. per-agent weight overrides
    /// 4. advanced overrides
    /// 5. explicit execution mode
    pub fn resolve(&self) -> ExecutionConfig {
        // Layer 1: preset
        let mut config = self
            .preset
            .unwrap_or(Preset::Balanced)
            .base_config();

        // Layer 2: models
        for (spec, model_override) in &self.models {
            if let Some(agent) = config.agents.get_mut(spec) {
                if let Some(model) = &model_override.model {
                    agent.model = model.clone();
                }
                if let Some(provider) = &model_override.provider {
                    agent.provider = provider.clone();
                }
            }
        }

        // Layer 3: weights
        for (spec, weight) in &self.weights {
            if let Some(agent) = config.agents.get_mut(spec) {
                agent.weight = *weight;
            }
        }

        // Layer 4: advanced
        if let Some(timeout_ms) = self.advanced.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(fallback) = self.advanced.fallback_to_single_agent {
            config.fallback_to_single_agent = fallback;
        }
        if let Some(strategy) = self.advanced.blending_strategy {
            config.orchestrator.blending_strategy = strategy;
        }
        if let Some(model) = &self.advanced.orchestrator_model {
            config.orchestrator.model = model.clone();
        }
        if let Some(provider) = &self.advanced.orchestrator_provider {
            config.orchestrator.provider = provider.clone();
        }

        // Layer 5: explicit mode
        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overlay_is_default_config() {
        let config = ConfigOverlay::default().resolve();
        assert_eq!(config, ExecutionConfig::default());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [Preset::Balanced, Preset::Fast, Preset::Thorough] {
            assert!(preset.base_config().validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_preset_layer_applies_first() {
        let overlay = ConfigOverlay {
            preset: Some(Preset::Fast),
            ..Default::default()
        };
        let config = overlay.resolve();
        assert_eq!(config.timeout_ms, 15_000);
        assert_eq!(
            config.orchestrator.blending_strategy,
            BlendingStrategy::BestOfThree
        );
    }

    #[test]
    fn test_model_and_weight_layers() {
        let overlay = ConfigOverlay {
            models: HashMap::from([(
                AgentSpecialization::Analytical,
                ModelOverride {
                    model: Some("o3-mini".to_string()),
                    provider: None,
                },
            )]),
            weights: HashMap::from([(AgentSpecialization::Analytical, 0.9)]),
            ..Default::default()
        };
        let config = overlay.resolve();
        let analytical = &config.agents[&AgentSpecialization::Analytical];
        assert_eq!(analytical.model, "o3-mini");
        assert_eq!(analytical.provider, Provider::OpenAi); // untouched
        assert_eq!(analytical.weight, 0.9);
    }

    #[test]
    fn test_advanced_overrides_preset() {
        let overlay = ConfigOverlay {
            preset: Some(Preset::Fast),
            advanced: AdvancedOverrides {
                timeout_ms: Some(30_000),
                blending_strategy: Some(BlendingStrategy::Hierarchical),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = overlay.resolve();
        // advanced wins over the Fast preset's values
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(
            config.orchestrator.blending_strategy,
            BlendingStrategy::Hierarchical
        );
    }

    #[test]
    fn test_explicit_mode_wins_last() {
        let overlay = ConfigOverlay {
            preset: Some(Preset::Thorough),
            mode: Some(ExecutionMode::Hybrid),
            ..Default::default()
        };
        assert_eq!(overlay.resolve().mode, ExecutionMode::Hybrid);
    }
}
