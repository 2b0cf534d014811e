//! Orchestration domain: result types and the pure algorithms used to
//! merge agent responses (conflict resolution, ranking, attribution).

pub mod attribution;
pub mod conflict;
pub mod ranking;
pub mod strategy;
pub mod value_objects;

pub use attribution::attribute;
pub use conflict::resolve_conflicts;
pub use ranking::{rank_best, response_score};
pub use strategy::BlendingStrategy;
pub use value_objects::{
    AgentAttribution, AgentResult, CompositeResult, ExecutionMeta, ResultMetadata,
};
