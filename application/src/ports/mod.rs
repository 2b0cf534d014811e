//! Ports: interfaces the engine consumes, implemented elsewhere.

pub mod credentials;
pub mod llm_gateway;
pub mod progress;

pub use credentials::{CredentialError, CredentialStore};
pub use llm_gateway::{
    ChunkEvent, GatewayError, LlmGateway, LlmRequest, LlmResponse, StreamHandle,
};
pub use progress::{ExecutionPhase, NoProgress, ProgressNotifier};
