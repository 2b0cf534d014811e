//! Streaming events emitted during a streaming execution.
//!
//! [`StreamEvent`] is the tagged union delivered to streaming consumers:
//! per-agent lifecycle events, orchestrator output chunks, and one
//! terminal completion event. Events are transient; they are never
//! persisted.

use crate::agent::specialization::AgentSpecialization;
use crate::orchestration::value_objects::{CompositeResult, ResultMetadata};

/// An event in a streaming execution.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// An agent's stream has been launched.
    AgentStart {
        specialization: AgentSpecialization,
        timestamp: u64,
    },
    /// An incremental chunk of one agent's output.
    AgentChunk {
        specialization: AgentSpecialization,
        /// The new text in this chunk.
        delta: String,
        /// Everything received from this agent so far.
        content: String,
        timestamp: u64,
    },
    /// An agent's stream finished (successfully or error-shaped).
    AgentComplete {
        specialization: AgentSpecialization,
        content: String,
        metadata: ResultMetadata,
        timestamp: u64,
    },
    /// An incremental chunk of the orchestrator's blended output.
    OrchestratorChunk {
        delta: String,
        content: String,
        timestamp: u64,
    },
    /// Terminal event: the full composite result.
    TrinityComplete {
        result: Box<CompositeResult>,
        timestamp: u64,
    },
    /// Terminal event: the execution failed after streaming began.
    Error { message: String, timestamp: u64 },
}

impl StreamEvent {
    /// The specialization this event belongs to, for per-agent events.
    pub fn specialization(&self) -> Option<AgentSpecialization> {
        match self {
            StreamEvent::AgentStart { specialization, .. }
            | StreamEvent::AgentChunk { specialization, .. }
            | StreamEvent::AgentComplete { specialization, .. } => Some(*specialization),
            _ => None,
        }
    }

    /// The incremental text carried by this event, if any.
    pub fn delta(&self) -> Option<&str> {
        match self {
            StreamEvent::AgentChunk { delta, .. }
            | StreamEvent::OrchestratorChunk { delta, .. } => Some(delta),
            _ => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::TrinityComplete { .. } | StreamEvent::Error { .. }
        )
    }
}
