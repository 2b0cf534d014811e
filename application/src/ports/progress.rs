//! Progress notification port
//!
//! Defines the interface for reporting progress during an execution.

use trinity_domain::AgentSpecialization;

/// The phases of one execution, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    /// Agents are being invoked.
    Agents,
    /// Surviving responses are being blended.
    Blending,
    /// Single-agent fallback after all agents failed.
    Fallback,
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionPhase::Agents => write!(f, "agents"),
            ExecutionPhase::Blending => write!(f, "blending"),
            ExecutionPhase::Fallback => write!(f, "fallback"),
        }
    }
}

/// Callback for progress updates during an execution.
///
/// Implementations live in the caller layer and can display progress in
/// various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &ExecutionPhase, total_tasks: usize);

    /// Called when one agent finishes within a phase
    fn on_agent_complete(&self, specialization: &AgentSpecialization, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &ExecutionPhase);
}

/// No-op progress notifier for callers that don't track progress.
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &ExecutionPhase, _total_tasks: usize) {}
    fn on_agent_complete(&self, _specialization: &AgentSpecialization, _success: bool) {}
    fn on_phase_complete(&self, _phase: &ExecutionPhase) {}
}
