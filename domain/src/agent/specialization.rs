//! Agent specialization value object.
//!
//! [`AgentSpecialization`] is a closed set: adding a new kind means adding
//! its keyword table, system prompt, and validation rule here, not
//! subclassing. Per-kind behavior throughout the domain is dispatched via
//! lookup tables keyed by this enum.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// The three agent specializations (Value Object).
///
/// Each specialization answers the same prompt from a different angle:
/// analytical (structure and reasoning), creative (imagination and
/// metaphor), factual (sources and accuracy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentSpecialization {
    Analytical,
    Creative,
    Factual,
}

impl AgentSpecialization {
    /// All specializations in registration order.
    ///
    /// Sequential execution, tie-breaking, and stream draining all follow
    /// this order.
    pub const ALL: [AgentSpecialization; 3] = [
        AgentSpecialization::Analytical,
        AgentSpecialization::Creative,
        AgentSpecialization::Factual,
    ];

    /// Get the string identifier for this specialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentSpecialization::Analytical => "analytical",
            AgentSpecialization::Creative => "creative",
            AgentSpecialization::Factual => "factual",
        }
    }

    /// Domain keywords that signal a response plays to this
    /// specialization's strengths.
    ///
    /// Used by the confidence heuristic and by response ranking.
    pub fn domain_keywords(&self) -> &'static [&'static str] {
        match self {
            AgentSpecialization::Analytical => &["data", "analysis", "pattern", "conclude"],
            AgentSpecialization::Creative => &["creative", "innovative", "imagine", "metaphor"],
            AgentSpecialization::Factual => &["source", "research", "study", "fact"],
        }
    }

    /// Default system prompt for this specialization.
    pub fn default_system_prompt(&self) -> &'static str {
        match self {
            AgentSpecialization::Analytical => {
                "You are the analytical member of a three-agent council. \
                 Break the question down, reason step by step, and support \
                 every conclusion with structure: numbered points, evidence, \
                 and explicit logic."
            }
            AgentSpecialization::Creative => {
                "You are the creative member of a three-agent council. \
                 Approach the question laterally: offer imaginative framings, \
                 metaphors, and unconventional angles the other agents will \
                 not consider."
            }
            AgentSpecialization::Factual => {
                "You are the factual member of a three-agent council. \
                 Stick to verifiable information, cite sources or studies \
                 where possible, and avoid speculation or hedging."
            }
        }
    }
}

impl std::fmt::Display for AgentSpecialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentSpecialization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analytical" => Ok(AgentSpecialization::Analytical),
            "creative" => Ok(AgentSpecialization::Creative),
            "factual" => Ok(AgentSpecialization::Factual),
            other => Err(ConfigError::UnknownSpecialization(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_roundtrip() {
        for spec in AgentSpecialization::ALL {
            let parsed: AgentSpecialization = spec.as_str().parse().unwrap();
            assert_eq!(spec, parsed);
        }
    }

    #[test]
    fn test_unknown_specialization_rejected() {
        let result = "philosophical".parse::<AgentSpecialization>();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownSpecialization(_))
        ));
    }

    #[test]
    fn test_registration_order() {
        assert_eq!(
            AgentSpecialization::ALL,
            [
                AgentSpecialization::Analytical,
                AgentSpecialization::Creative,
                AgentSpecialization::Factual
            ]
        );
    }

    #[test]
    fn test_each_kind_has_keywords_and_prompt() {
        for spec in AgentSpecialization::ALL {
            assert!(!spec.domain_keywords().is_empty());
            assert!(!spec.default_system_prompt().is_empty());
        }
    }

    #[test]
    fn test_serde_uses_snake_case_strings() {
        let json = serde_json::to_string(&AgentSpecialization::Analytical).unwrap();
        assert_eq!(json, "\"analytical\"");
    }
}
