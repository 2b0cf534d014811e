//! Infrastructure layer for trinity
//!
//! Adapters for the application's outbound ports: TOML/environment
//! configuration loading and an environment-backed credential store.
//! Provider gateways (HTTP adapters per LLM vendor) are deliberately
//! separate crates implementing [`trinity_application::LlmGateway`].

pub mod config;
pub mod credentials;

pub use config::{ConfigLoadError, ConfigLoader, FileConfig};
pub use credentials::EnvCredentialStore;
