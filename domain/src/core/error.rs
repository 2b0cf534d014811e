//! Domain error types

use thiserror::Error;

/// Configuration validation errors.
///
/// Every range and shape invariant on [`AgentConfig`] and
/// [`ExecutionConfig`] maps to one variant here, so callers get a precise
/// reason instead of a bare boolean.
///
/// [`AgentConfig`]: crate::agent::config::AgentConfig
/// [`ExecutionConfig`]: crate::execution::config::ExecutionConfig
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("temperature {0} is out of range [0.0, 2.0]")]
    TemperatureOutOfRange(f64),

    #[error("max_tokens {0} is out of range [1, 4096]")]
    MaxTokensOutOfRange(u32),

    #[error("weight {0} is out of range [0.0, 1.0]")]
    WeightOutOfRange(f64),

    #[error("timeout_ms {0} is out of range [1000, 300000]")]
    TimeoutOutOfRange(u64),

    #[error("model id must not be empty")]
    EmptyModel,

    #[error("no agent config for specialization '{0}'")]
    MissingSpecialization(String),

    #[error("unknown specialization: {0}")]
    UnknownSpecialization(String),

    #[error("unknown execution mode: {0}")]
    UnknownMode(String),

    #[error("unknown blending strategy: {0}")]
    UnknownStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ConfigError::TemperatureOutOfRange(2.5);
        assert_eq!(error.to_string(), "temperature 2.5 is out of range [0.0, 2.0]");
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(
            ConfigError::EmptyModel,
            ConfigError::EmptyModel
        );
        assert_ne!(
            ConfigError::UnknownMode("x".to_string()),
            ConfigError::UnknownStrategy("x".to_string())
        );
    }
}
