//! Local asset cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that fail a whole cache rebuild.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage directory could not be listed.
    #[error("failed to list storage directory {path}: {source}")]
    Listing {
        /// Directory that was being listed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A blocking rebuild task did not complete.
    #[error("cache rebuild task failed: {0}")]
    Task(String),
}

impl CacheError {
    /// Creates listing error.
    #[must_use]
    pub fn listing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Listing {
            path: path.into(),
            source,
        }
    }
}
