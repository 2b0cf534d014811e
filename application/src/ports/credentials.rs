//! Credential lookup port
//!
//! API keys are resolved once per enabled provider before any agent call
//! is made; a missing key is a precondition failure, never retried.

use async_trait::async_trait;
use thiserror::Error;
use trinity_domain::Provider;

/// Errors from the credential backend itself (not "key absent").
#[derive(Error, Debug, Clone)]
pub enum CredentialError {
    #[error("Credential lookup failed: {0}")]
    LookupFailed(String),
}

/// Per-user, per-provider API key lookup.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve the API key for `user_id` at `provider`.
    ///
    /// `Ok(None)` means no key is configured; the caller decides whether
    /// that is fatal.
    async fn resolve(
        &self,
        user_id: &str,
        provider: &Provider,
    ) -> Result<Option<String>, CredentialError>;
}
