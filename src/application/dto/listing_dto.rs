//! Local listing records.

use serde::Serialize;

use crate::domain::entities::LocalAsset;

/// One entry of the local listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord<'a> {
    /// Local media identifier.
    pub id: &'a str,
    /// Name inside the storage directory.
    pub filename: &'a str,
    /// Public media path.
    pub url: &'a str,
    /// Pixel width, if probed.
    pub width: Option<u32>,
    /// Pixel height, if probed.
    pub height: Option<u32>,
    /// Sniffed content type.
    pub mimetype: &'a str,
}

impl<'a> From<&'a LocalAsset> for ListingRecord<'a> {
    fn from(asset: &'a LocalAsset) -> Self {
        Self {
            id: &asset.id,
            filename: &asset.filename,
            url: &asset.url,
            width: asset.width,
            height: asset.height,
            mimetype: &asset.mimetype,
        }
    }
}

/// Maps a snapshot to listing records, preserving its order.
#[must_use]
pub fn listing_records(assets: &[LocalAsset]) -> Vec<ListingRecord<'_>> {
    assets.iter().map(ListingRecord::from).collect()
}
