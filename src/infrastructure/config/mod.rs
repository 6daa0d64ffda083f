//! Application configuration.

pub mod app_config;
pub mod args;
pub mod loader;

pub use app_config::{
    AppConfig, DEFAULT_GIPHY_DESTINATION, DEFAULT_TENOR_DESTINATION, LogLevel,
};
pub use args::{CliArgs, Command};
pub use loader::{ConfigError, ConfigLoader};
