//! Execution mode value object.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Scheduling pattern for running the enabled agents.
///
/// - `Parallel`: all agents at once, staggered starts, settle-all.
/// - `Sequential`: one at a time in registration order, each seeing the
///   prior successes as context.
/// - `Hybrid`: factual + analytical concurrently, then creative with the
///   first phase's successes as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Parallel,
    Sequential,
    Hybrid,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Hybrid => "hybrid",
        }
    }
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Parallel
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parallel" => Ok(ExecutionMode::Parallel),
            "sequential" => Ok(ExecutionMode::Sequential),
            "hybrid" => Ok(ExecutionMode::Hybrid),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}
