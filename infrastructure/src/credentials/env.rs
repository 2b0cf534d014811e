//! Environment-backed credential store.
//!
//! Single-user deployments keep API keys in the environment. For each
//! provider the scoped `TRINITY_<PROVIDER>_API_KEY` variable wins over
//! the provider's conventional variable (e.g. `OPENAI_API_KEY`). The
//! `user_id` is ignored; multi-tenant stores live behind the same port.

use async_trait::async_trait;
use tracing::debug;
use trinity_application::ports::credentials::{CredentialError, CredentialStore};
use trinity_domain::Provider;

#[derive(Debug, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    pub fn new() -> Self {
        Self
    }

    /// The scoped environment variable for `provider`.
    pub fn scoped_env_key(provider: &Provider) -> String {
        format!(
            "TRINITY_{}_API_KEY",
            provider.as_str().to_uppercase().replace('-', "_")
        )
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn resolve(
        &self,
        _user_id: &str,
        provider: &Provider,
    ) -> Result<Option<String>, CredentialError> {
        let scoped = Self::scoped_env_key(provider);
        if let Ok(key) = std::env::var(&scoped) {
            if !key.is_empty() {
                debug!(provider = %provider, variable = %scoped, "credential resolved");
                return Ok(Some(key));
            }
        }

        if let Some(conventional) = provider.conventional_env_key() {
            if let Ok(key) = std::env::var(conventional) {
                if !key.is_empty() {
                    debug!(provider = %provider, variable = conventional, "credential resolved");
                    return Ok(Some(key));
                }
            }
        }

        Ok(None)
    }
}
