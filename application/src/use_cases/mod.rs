//! Use cases: the operations the engine exposes.

pub mod run_trinity;
pub mod stream_trinity;

pub use run_trinity::{RunTrinityInput, RunTrinityUseCase, TrinityError, STAGGER_INTERVAL};
pub use stream_trinity::StreamTrinityUseCase;
