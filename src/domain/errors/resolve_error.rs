//! Identifier resolution error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::Namespace;

/// Message shown to clients for every malformed or unresolvable identifier.
pub const INVALID_ID_MESSAGE: &str = "invalid media identifier";

/// Local payload decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum DecodeError {
    #[error("payload is not unpadded url-safe base64: {0}")]
    Base64(String),

    #[error("decoded filename is not valid utf-8")]
    NotUtf8,

    #[error("{0} identifier has no local payload")]
    NotLocal(Namespace),
}

/// Resolution error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ResolveError {
    #[error("unrecognised media identifier: {raw:?}")]
    InvalidIdentifier { raw: String },

    #[error("malformed local identifier {raw:?}: {source}")]
    Decode {
        raw: String,
        #[source]
        source: DecodeError,
    },

    #[error("local identifier {raw:?} escapes the storage root via {filename:?}")]
    PathEscape { raw: String, filename: String },

    #[error("no local file for identifier {raw:?}")]
    NotFound { raw: String },

    #[error("storage root {path} unavailable: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Creates invalid identifier error.
    #[must_use]
    pub fn invalid(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier { raw: raw.into() }
    }

    /// Creates path escape error.
    #[must_use]
    pub fn path_escape(raw: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::PathEscape {
            raw: raw.into(),
            filename: filename.into(),
        }
    }

    /// Returns whether the error is a fault in the client's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage { .. })
    }

    /// Returns whether the identifier itself is malformed or unsafe.
    ///
    /// Path escapes are reported like any other malformed identifier.
    #[must_use]
    pub const fn is_invalid_identifier(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::Decode { .. } | Self::PathEscape { .. }
        )
    }

    /// Returns the message safe to show a client.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } | Self::Decode { .. } | Self::PathEscape { .. } => {
                INVALID_ID_MESSAGE
            }
            Self::NotFound { .. } => "media not found",
            Self::Storage { .. } => "local storage unavailable",
        }
    }
}

/// Errors surfaced to the media proxy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ProxyError {
    #[error("invalid media ID syntax")]
    InvalidMediaIdSyntax,
}
