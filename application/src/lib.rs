//! Application layer for trinity
//!
//! Orchestrates the domain: specialized agents, the per-request registry,
//! the response orchestrator, and the two top-level use cases (blocking
//! and streaming execution). Outbound dependencies are expressed as ports
//! so provider adapters and credential stores stay out of this crate.

pub mod agent;
pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use agent::{AgentContext, SpecializedAgent};
pub use orchestrator::{BlendOutcome, Orchestrator, OrchestratorError};
pub use ports::{
    ChunkEvent, CredentialError, CredentialStore, ExecutionPhase, GatewayError, LlmGateway,
    LlmRequest, LlmResponse, NoProgress, ProgressNotifier, StreamHandle,
};
pub use registry::AgentRegistry;
pub use use_cases::{
    RunTrinityInput, RunTrinityUseCase, StreamTrinityUseCase, TrinityError, STAGGER_INTERVAL,
};
