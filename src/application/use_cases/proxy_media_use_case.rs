//! Media lookup for the federation media proxy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::resolve_media_use_case::{MediaResolver, is_plain_filename};
use crate::domain::entities::{MediaId, join_public_path};
use crate::domain::errors::ProxyError;

/// URL the media proxy should fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyMedia {
    /// Source URL.
    pub url: String,
    /// When the URL stops being valid, if it expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ProxyMedia {
    /// Creates a non-expiring response.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expires_at: None,
        }
    }
}

/// Maps identifiers to fetchable URLs for the media proxy.
///
/// Local identifiers point back at this server's own media endpoint, which
/// performs the containment check when the proxy fetches them.
pub struct ProxyMediaUseCase {
    resolver: Arc<MediaResolver>,
    server_name: String,
    gif_path: String,
}

impl ProxyMediaUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(
        resolver: Arc<MediaResolver>,
        server_name: impl Into<String>,
        gif_path: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            server_name: server_name.into(),
            gif_path: gif_path.into(),
        }
    }

    /// Resolves a raw identifier for the proxy.
    ///
    /// # Errors
    /// Returns `ProxyError::InvalidMediaIdSyntax` for invalid identifiers and
    /// local identifiers whose payload does not decode to a plain filename.
    pub fn resolve_for_proxy(&self, raw: &str) -> Result<ProxyMedia, ProxyError> {
        info!(id = %raw, "Getting media for ID");

        let id = MediaId::parse(raw);
        match &id {
            MediaId::Giphy(_) | MediaId::Tenor(_) => self
                .resolver
                .destinations()
                .redirect_url(&id)
                .map(ProxyMedia::new)
                .ok_or(ProxyError::InvalidMediaIdSyntax),
            MediaId::Local(_) => {
                let filename = id.decode_local().map_err(|e| {
                    debug!(id = %raw, error = %e, "Undecodable local identifier");
                    ProxyError::InvalidMediaIdSyntax
                })?;
                if !is_plain_filename(&filename) {
                    debug!(id = %raw, "Local identifier is not a plain filename");
                    return Err(ProxyError::InvalidMediaIdSyntax);
                }
                let path = join_public_path(&self.gif_path, raw);
                Ok(ProxyMedia::new(format!("https://{}{path}", self.server_name)))
            }
            MediaId::Invalid(_) => Err(ProxyError::InvalidMediaIdSyntax),
        }
    }
}
