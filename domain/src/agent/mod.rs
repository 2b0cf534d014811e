//! Agent domain: specializations, per-agent configuration, and the fixed
//! confidence/validation rule tables.

pub mod config;
pub mod confidence;
pub mod specialization;
pub mod validation;

pub use config::{AgentConfig, AgentConfigPatch};
pub use confidence::confidence_score;
pub use specialization::AgentSpecialization;
pub use validation::validate_response;
