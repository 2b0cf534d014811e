//! Credential store adapters.

pub mod env;

pub use env::EnvCredentialStore;
