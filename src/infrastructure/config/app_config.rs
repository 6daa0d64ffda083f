//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::assets::CacheSettings;

const APP_NAME: &str = "stickerproxy";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";

/// Default Giphy redirect template.
pub const DEFAULT_GIPHY_DESTINATION: &str = "https://i.giphy.com/%s.webp";
/// Default Tenor redirect template.
pub const DEFAULT_TENOR_DESTINATION: &str = "https://media.tenor.com/%s/image.webp";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Public server name used in proxied local URLs.
    pub server_name: String,

    /// Giphy URL template, `%s` is replaced by the content key.
    #[serde(alias = "destination")]
    pub giphy_destination: String,

    /// Tenor URL template, `%s` is replaced by the content key.
    pub tenor_destination: String,

    /// Giphy API key. Only its presence matters here.
    pub giphy_api_key: String,

    /// Tenor API key. Only its presence matters here.
    pub tenor_api_key: String,

    /// Path of the picker page.
    pub index_path: String,

    /// Directory holding local stickers.
    pub storage_path: PathBuf,

    /// Bearer token for the local listing endpoint.
    pub local_api_bearer: String,

    /// Path prefix local media is served under.
    pub gif_path: String,

    /// Locale passed to the picker page.
    pub locale: String,

    /// Local listing freshness window in seconds.
    pub cache_ttl_secs: u64,

    /// List files that are not decodable images, with unknown dimensions.
    pub list_unprobed: bool,

    /// Log verbosity level.
    pub log_level: LogLevel,

    /// Log file path. Logs go to stderr when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_name: String::new(),
            giphy_destination: DEFAULT_GIPHY_DESTINATION.to_string(),
            tenor_destination: DEFAULT_TENOR_DESTINATION.to_string(),
            giphy_api_key: String::new(),
            tenor_api_key: String::new(),
            index_path: "/".to_string(),
            storage_path: PathBuf::from("stickers"),
            local_api_bearer: String::new(),
            gif_path: "/gif/".to_string(),
            locale: "en_US".to_string(),
            cache_ttl_secs: 300,
            list_unprobed: false,
            log_level: LogLevel::Info,
            log_path: None,
        }
    }
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(server_name) = &args.server_name {
            self.server_name.clone_from(server_name);
        }
        if let Some(storage_path) = &args.storage_path {
            self.storage_path.clone_from(storage_path);
        }
        if let Some(gif_path) = &args.gif_path {
            self.gif_path.clone_from(gif_path);
        }
        if let Some(ttl) = args.cache_ttl_secs {
            self.cache_ttl_secs = ttl;
        }
        if let Some(list_unprobed) = args.list_unprobed {
            self.list_unprobed = list_unprobed;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
    }

    /// Fills empty values with their defaults and normalises the locale.
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        if self.giphy_destination.is_empty() {
            self.giphy_destination = defaults.giphy_destination;
        }
        if self.tenor_destination.is_empty() {
            self.tenor_destination = defaults.tenor_destination;
        }
        if self.index_path.is_empty() {
            self.index_path = defaults.index_path;
        }
        if self.gif_path.is_empty() {
            self.gif_path = defaults.gif_path;
        }
        if self.locale.is_empty() {
            self.locale = defaults.locale;
        }
        self.locale = self.locale.replace('-', "_");
    }

    /// Returns the local listing freshness window.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Builds the local asset cache settings.
    #[must_use]
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(self.storage_path.clone(), self.gif_path.clone())
            .with_ttl(self.cache_ttl())
            .with_list_unprobed(self.list_unprobed)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}
