//! Execution configuration: modes, per-run settings, and the layered
//! overlay used to customize them.

pub mod config;
pub mod mode;
pub mod overlay;

pub use config::{ExecutionConfig, OrchestratorConfig, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
pub use mode::ExecutionMode;
pub use overlay::{AdvancedOverrides, ConfigOverlay, ModelOverride, Preset};
