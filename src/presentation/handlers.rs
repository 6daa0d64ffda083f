//! Endpoint handlers.
//!
//! Each handler returns a [`HandlerResponse`] describing status, headers and
//! body, so any router can host them. The router owns transport, range
//! requests and the bearer check in front of the listing.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::application::dto::{PickerPageContext, listing_records};
use crate::application::use_cases::{
    Destinations, MediaResolver, ProxyMedia, ProxyMediaUseCase, Resolution,
};
use crate::domain::errors::{ProxyError, ResolveError};
use crate::domain::ports::SystemClock;
use crate::infrastructure::assets::{FsDirectoryLister, LocalAssetCache};
use crate::infrastructure::config::AppConfig;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200.
    Ok,
    /// 302.
    Found,
    /// 400.
    BadRequest,
    /// 404.
    NotFound,
    /// 500.
    InternalServerError,
}

impl Status {
    /// Returns the numeric HTTP status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Found => 302,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body.
    Empty,
    /// In-memory body.
    Text(String),
    /// Stream this validated file from disk.
    File(PathBuf),
}

/// Transport-independent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// Status.
    pub status: Status,
    /// Content type header, if any.
    pub content_type: Option<String>,
    /// Location header for redirects.
    pub location: Option<String>,
    /// Body.
    pub body: ResponseBody,
}

impl HandlerResponse {
    fn redirect(url: String) -> Self {
        Self {
            status: Status::Found,
            content_type: None,
            location: Some(url),
            body: ResponseBody::Empty,
        }
    }

    fn file(path: PathBuf, mimetype: String) -> Self {
        Self {
            status: Status::Ok,
            content_type: Some(mimetype),
            location: None,
            body: ResponseBody::File(path),
        }
    }

    fn text(status: Status, message: &str) -> Self {
        Self {
            status,
            content_type: Some(TEXT.to_string()),
            location: None,
            body: ResponseBody::Text(message.to_string()),
        }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: Status::Ok,
                content_type: Some(JSON.to_string()),
                location: None,
                body: ResponseBody::Text(body),
            },
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                Self::text(Status::InternalServerError, "failed to encode response")
            }
        }
    }
}

/// All endpoint handlers, sharing one cache and resolver.
pub struct Handlers {
    config: AppConfig,
    cache: Arc<LocalAssetCache>,
    resolver: Arc<MediaResolver>,
    proxy: ProxyMediaUseCase,
}

impl Handlers {
    /// Creates handlers over explicitly constructed collaborators.
    #[must_use]
    pub fn new(
        config: AppConfig,
        cache: Arc<LocalAssetCache>,
        resolver: Arc<MediaResolver>,
    ) -> Self {
        let proxy = ProxyMediaUseCase::new(
            Arc::clone(&resolver),
            config.server_name.clone(),
            config.gif_path.clone(),
        );
        Self {
            config,
            cache,
            resolver,
            proxy,
        }
    }

    /// Wires handlers against the real filesystem and clock.
    #[must_use]
    pub fn from_config(config: AppConfig) -> Self {
        let cache = Arc::new(LocalAssetCache::new(
            config.cache_settings(),
            Arc::new(FsDirectoryLister),
            Arc::new(SystemClock),
        ));
        let resolver = Arc::new(MediaResolver::new(
            Destinations {
                giphy: config.giphy_destination.clone(),
                tenor: config.tenor_destination.clone(),
            },
            config.storage_path.clone(),
        ));
        Self::new(config, cache, resolver)
    }

    /// Returns the shared asset cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<LocalAssetCache> {
        &self.cache
    }

    /// `GET {gif_path}{id}`: redirects remote ids, serves local ids.
    #[must_use]
    pub fn media(&self, id: &str) -> HandlerResponse {
        match self.resolver.resolve(id) {
            Ok(Resolution::Redirect { url }) => HandlerResponse::redirect(url),
            Ok(Resolution::LocalFile { path, mimetype }) => HandlerResponse::file(path, mimetype),
            Err(e) => Self::resolve_failure(&e),
        }
    }

    /// Lookup entry point for the federation media proxy.
    ///
    /// # Errors
    /// Returns `ProxyError::InvalidMediaIdSyntax` for unusable identifiers.
    pub fn resolve_for_proxy(&self, id: &str) -> Result<ProxyMedia, ProxyError> {
        self.proxy.resolve_for_proxy(id)
    }

    /// `GET` local listing: every asset of the current snapshot as JSON.
    #[must_use]
    pub fn local_listing(&self) -> HandlerResponse {
        match self.cache.get() {
            Ok(snapshot) => HandlerResponse::json(&listing_records(&snapshot)),
            Err(e) => {
                error!(error = %e, "Failed to list local files");
                HandlerResponse::text(Status::InternalServerError, "local storage unavailable")
            }
        }
    }

    /// Builds the picker page context.
    #[must_use]
    pub fn page_context(&self) -> PickerPageContext {
        PickerPageContext::new(&self.config, self.cache.has_assets())
    }

    /// `GET {index_path}`: the picker page context as JSON.
    #[must_use]
    pub fn picker_page(&self) -> HandlerResponse {
        HandlerResponse::json(&self.page_context())
    }

    fn resolve_failure(e: &ResolveError) -> HandlerResponse {
        let status = match e {
            ResolveError::InvalidIdentifier { .. }
            | ResolveError::Decode { .. }
            | ResolveError::PathEscape { .. } => Status::BadRequest,
            ResolveError::NotFound { .. } => Status::NotFound,
            ResolveError::Storage { .. } => Status::InternalServerError,
        };
        if e.is_client_error() {
            debug!(error = %e, "Rejected media request");
        } else {
            warn!(error = %e, "Failed to resolve media");
        }
        HandlerResponse::text(status, e.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::encode_local;
    use image::RgbImage;
    use tempfile::TempDir;

    fn handlers() -> (Handlers, TempDir) {
        let dir = TempDir::new().unwrap();
        RgbImage::new(8, 8).save(dir.path().join("cat.png")).unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hello").unwrap();
        let config = AppConfig {
            server_name: "stickers.example.com".to_string(),
            storage_path: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        (Handlers::from_config(config), dir)
    }

    #[test]
    fn test_remote_media_redirects() {
        let (h, _dir) = handlers();
        let resp = h.media("g-abc123");
        assert_eq!(resp.status.code(), 302);
        assert_eq!(
            resp.location.as_deref(),
            Some("https://i.giphy.com/abc123.webp")
        );
    }

    #[test]
    fn test_local_media_serves_file() {
        let (h, dir) = handlers();
        let resp = h.media(&encode_local("cat.png"));

        assert_eq!(resp.status, Status::Ok);
        assert_eq!(resp.content_type.as_deref(), Some("image/png"));
        let expected = std::fs::canonicalize(dir.path().join("cat.png")).unwrap();
        assert_eq!(resp.body, ResponseBody::File(expected));
    }

    #[test]
    fn test_extensionless_local_file_keeps_real_type() {
        let (h, dir) = handlers();
        RgbImage::new(4, 4)
            .save_with_format(dir.path().join("wave"), image::ImageFormat::Png)
            .unwrap();

        let resp = h.media(&encode_local("wave"));

        assert_eq!(resp.status, Status::Ok);
        assert_eq!(resp.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_bad_ids_share_one_client_error() {
        let (h, _dir) = handlers();
        let escape = h.media(&encode_local("../../etc/passwd"));
        let invalid = h.media("x-whatever");
        let malformed = h.media("l-a+b/c==");

        for resp in [&escape, &invalid, &malformed] {
            assert_eq!(resp.status, Status::BadRequest);
            assert!(!matches!(resp.body, ResponseBody::File(_)));
        }
        assert_eq!(escape.body, invalid.body);
        assert_eq!(malformed.body, invalid.body);
    }

    #[test]
    fn test_missing_local_file() {
        let (h, _dir) = handlers();
        assert_eq!(h.media(&encode_local("gone.png")).status, Status::NotFound);
    }

    #[test]
    fn test_local_listing() {
        let (h, _dir) = handlers();
        let resp = h.local_listing();

        assert_eq!(resp.status, Status::Ok);
        let ResponseBody::Text(body) = resp.body else {
            panic!("expected json body");
        };
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["filename"], "cat.png");
        assert_eq!(entries[0]["url"], format!("/gif/{}", encode_local("cat.png")));
    }

    #[test]
    fn test_listing_failure_is_server_error() {
        let (h, dir) = handlers();
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());

        assert_eq!(h.local_listing().status, Status::InternalServerError);
        assert!(!h.page_context().has_local_files);
    }

    #[test]
    fn test_page_context() {
        let (h, _dir) = handlers();
        let ctx = h.page_context();

        assert!(ctx.has_local_files);
        assert_eq!(ctx.server_name, "stickers.example.com");
        assert_eq!(h.picker_page().status, Status::Ok);
    }

    #[test]
    fn test_resolve_for_proxy() {
        let (h, _dir) = handlers();
        let id = encode_local("cat.png");
        assert_eq!(
            h.resolve_for_proxy(&id).unwrap().url,
            format!("https://stickers.example.com/gif/{id}")
        );
        assert_eq!(
            h.resolve_for_proxy("nope"),
            Err(ProxyError::InvalidMediaIdSyntax)
        );
    }
}
