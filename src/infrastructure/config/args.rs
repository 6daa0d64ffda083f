use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "stickerproxy",
    version,
    about = "Resolve sticker picker media identifiers and list local stickers",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "STICKERPROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Public server name.
    #[arg(long)]
    pub server_name: Option<String>,

    /// Local sticker directory.
    #[arg(long, value_name = "DIR")]
    pub storage_path: Option<PathBuf>,

    /// Path prefix local media is served under.
    #[arg(long)]
    pub gif_path: Option<String>,

    /// Local listing freshness window in seconds.
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// List files that are not decodable images.
    #[arg(long)]
    pub list_unprobed: Option<bool>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the local sticker listing as JSON.
    List,
    /// Resolve an identifier the way the media endpoint does.
    Resolve {
        /// Media identifier.
        id: String,
    },
    /// Resolve an identifier for the federation media proxy.
    Proxy {
        /// Media identifier.
        id: String,
    },
    /// Print the picker page context as JSON.
    Page,
}
