//! Local asset entity.

use std::sync::Arc;

use serde::Serialize;

use super::media_id::MediaId;

/// MIME type used when a file's content type cannot be sniffed.
pub const FALLBACK_MIMETYPE: &str = "application/octet-stream";

/// A file found in the local storage directory during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalAsset {
    /// Stable identifier derived from the filename.
    pub id: String,
    /// Name of the file inside the storage directory.
    pub filename: String,
    /// Public path the file is served from.
    pub url: String,
    /// Pixel width, if the file decoded as an image.
    pub width: Option<u32>,
    /// Pixel height, if the file decoded as an image.
    pub height: Option<u32>,
    /// Sniffed content type.
    pub mimetype: String,
}

impl LocalAsset {
    /// Creates an asset for `filename`, served below `public_prefix`.
    #[must_use]
    pub fn new(filename: impl Into<String>, public_prefix: &str, mimetype: impl Into<String>) -> Self {
        let filename = filename.into();
        let id = MediaId::for_local_file(&filename).to_string();
        let url = join_public_path(public_prefix, &id);
        Self {
            id,
            filename,
            url,
            width: None,
            height: None,
            mimetype: mimetype.into(),
        }
    }

    /// Sets the dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns true if the dimensions are known.
    #[must_use]
    pub const fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// Immutable point-in-time list of local assets.
///
/// Cloning shares the entries.
pub type Snapshot = Arc<[LocalAsset]>;

/// Joins an identifier onto a public path prefix, always yielding `/prefix/id`.
#[must_use]
pub fn join_public_path(prefix: &str, id: &str) -> String {
    let segments: Vec<&str> = prefix
        .split('/')
        .chain(std::iter::once(id))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_id_and_url() {
        let asset = LocalAsset::new("cat.png", "/gif/", "image/png");
        assert_eq!(asset.id, "l-Y2F0LnBuZw");
        assert_eq!(asset.url, "/gif/l-Y2F0LnBuZw");
        assert!(!asset.has_dimensions());
    }

    #[test]
    fn test_same_filename_same_id() {
        let a = LocalAsset::new("wave.gif", "/gif/", "image/gif");
        let b = LocalAsset::new("wave.gif", "/stickers", "image/gif").with_dimensions(1, 1);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_join_public_path() {
        assert_eq!(join_public_path("/gif/", "l-x"), "/gif/l-x");
        assert_eq!(join_public_path("gif", "l-x"), "/gif/l-x");
        assert_eq!(join_public_path("//a//b/", "l-x"), "/a/b/l-x");
        assert_eq!(join_public_path("", "l-x"), "/l-x");
    }

    #[test]
    fn test_serializes_listing_fields() {
        let asset = LocalAsset::new("cat.png", "/gif/", "image/png").with_dimensions(64, 32);
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["id"], "l-Y2F0LnBuZw");
        assert_eq!(json["filename"], "cat.png");
        assert_eq!(json["url"], "/gif/l-Y2F0LnBuZw");
        assert_eq!(json["width"], 64);
        assert_eq!(json["height"], 32);
        assert_eq!(json["mimetype"], "image/png");
    }
}
