//! Configuration loading: raw TOML schema and multi-source merging.

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileAgentConfig, FileAgentsConfig, FileConfig, FileExecutionConfig, FileOrchestratorConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader};
