//! Core domain primitives shared across modules.

pub mod error;
pub mod provider;
