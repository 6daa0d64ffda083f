use super::app_config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while locating or reading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`AppConfig`].
    #[error("invalid config file {path}: {source}")]
    TomlDe {
        /// File that failed.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
}

/// Loads [`AppConfig`] from `config.toml` in a config directory.
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new `ConfigLoader` rooted at the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::default_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigLoader` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Loads and normalises the configuration.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// parsed is an error, so the server never starts against an unintended
    /// storage directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;
            toml::from_str::<AppConfig>(&content).map_err(|source| ConfigError::TomlDe {
                path: config_path.clone(),
                source,
            })?
        } else {
            info!(
                "Config file not found at {:?}, using defaults.",
                config_path
            );
            AppConfig::default()
        };

        config.normalize();
        Ok(config)
    }
}
