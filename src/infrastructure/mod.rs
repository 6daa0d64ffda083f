//! Infrastructure layer with filesystem and configuration adapters.

/// Local asset store (listing, probing, snapshot cache).
pub mod assets;
/// Application configuration.
pub mod config;

pub use assets::{CacheSettings, FsDirectoryLister, LocalAssetCache};
pub use config::{AppConfig, CliArgs, Command, ConfigLoader, LogLevel};
