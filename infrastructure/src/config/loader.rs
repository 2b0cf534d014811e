//! Configuration file loader with multi-source merging

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use thiserror::Error;
use tracing::debug;
use trinity_domain::{ConfigError, ExecutionConfig};

use super::file_config::FileConfig;

/// Errors from loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Read(#[from] Box<figment::Error>),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TRINITY_*` variables (e.g. `TRINITY_EXECUTION__MODE`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./trinity.toml` or `./.trinity.toml`
    /// 4. Global: `~/.config/trinity/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "merging global config");
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!(path = %project_path.display(), "merging project config");
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TRINITY_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Load, convert, and validate in one step.
    pub fn load_execution_config(
        config_path: Option<&PathBuf>,
    ) -> Result<ExecutionConfig, ConfigLoadError> {
        let file = Self::load(config_path)?;
        Ok(file.into_execution_config()?)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/trinity/config.toml if set, otherwise
    /// falls back to ~/.config/trinity/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("trinity").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["trinity.toml", ".trinity.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}
