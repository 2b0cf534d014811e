//! Domain layer for trinity
//!
//! This crate contains the core business logic and value objects of the
//! multi-agent orchestration engine. It has no dependencies on
//! infrastructure or transport concerns.
//!
//! # Core Concepts
//!
//! ## Trinity
//!
//! One prompt is posed to three specialized agents:
//!
//! - **Analytical**: structure, reasoning, explicit logic
//! - **Creative**: imaginative framings and lateral angles
//! - **Factual**: verifiable information and sources
//!
//! Their responses are scored, checked for contradictions, and blended
//! into a single answer with per-agent attribution.
//!
//! ## Closed rule tables
//!
//! Per-specialization behavior (confidence bonuses, validation rules,
//! system prompts) is dispatched through lookup tables keyed by
//! [`AgentSpecialization`], never through inheritance, so the rule set
//! stays closed and exhaustively testable.

pub mod agent;
pub mod core;
pub mod execution;
pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use agent::{
    config::{AgentConfig, AgentConfigPatch},
    confidence::confidence_score,
    specialization::AgentSpecialization,
    validation::validate_response,
};
pub use crate::core::{error::ConfigError, provider::Provider};
pub use execution::{
    config::{ExecutionConfig, OrchestratorConfig, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS},
    mode::ExecutionMode,
    overlay::{AdvancedOverrides, ConfigOverlay, ModelOverride, Preset},
};
pub use orchestration::{
    attribution::attribute,
    conflict::resolve_conflicts,
    ranking::{rank_best, response_score},
    strategy::BlendingStrategy,
    value_objects::{
        AgentAttribution, AgentResult, CompositeResult, ExecutionMeta, ResultMetadata,
    },
};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{latest_user_content, Message, Role},
    response::{FinishReason, TokenUsage},
    stream::StreamEvent,
};
