//! Blending strategy value object.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// How multiple agent responses are merged into one answer.
///
/// Each variant is a distinct algorithm, not a numeric knob:
/// - `WeightedMerge`: one extra LLM call merging responses proportionally
///   to confidence and weight.
/// - `BestOfThree`: no extra call; the top-ranked response wins verbatim.
/// - `Synthesis`: one extra call writing a fresh answer informed by all
///   responses.
/// - `Hierarchical`: one extra call refining the top response using the
///   others as supplements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendingStrategy {
    WeightedMerge,
    BestOfThree,
    Synthesis,
    Hierarchical,
}

impl BlendingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendingStrategy::WeightedMerge => "weighted_merge",
            BlendingStrategy::BestOfThree => "best_of_three",
            BlendingStrategy::Synthesis => "synthesis",
            BlendingStrategy::Hierarchical => "hierarchical",
        }
    }

    /// Whether this strategy issues an additional orchestrator LLM call.
    pub fn needs_llm_call(&self) -> bool {
        !matches!(self, BlendingStrategy::BestOfThree)
    }
}

impl Default for BlendingStrategy {
    fn default() -> Self {
        BlendingStrategy::WeightedMerge
    }
}

impl std::fmt::Display for BlendingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BlendingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted_merge" => Ok(BlendingStrategy::WeightedMerge),
            "best_of_three" => Ok(BlendingStrategy::BestOfThree),
            "synthesis" => Ok(BlendingStrategy::Synthesis),
            "hierarchical" => Ok(BlendingStrategy::Hierarchical),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_roundtrip() {
        for strategy in [
            BlendingStrategy::WeightedMerge,
            BlendingStrategy::BestOfThree,
            BlendingStrategy::Synthesis,
            BlendingStrategy::Hierarchical,
        ] {
            let parsed: BlendingStrategy = strategy.as_str().parse().unwrap();
            assert_eq!(strategy, parsed);
        }
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(matches!(
            "vote".parse::<BlendingStrategy>(),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_only_best_of_three_skips_llm() {
        assert!(!BlendingStrategy::BestOfThree.needs_llm_call());
        assert!(BlendingStrategy::WeightedMerge.needs_llm_call());
        assert!(BlendingStrategy::Synthesis.needs_llm_call());
        assert!(BlendingStrategy::Hierarchical.needs_llm_call());
    }
}
