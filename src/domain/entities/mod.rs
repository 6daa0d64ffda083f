//! Domain entity definitions.

mod local_asset;
mod media_id;

pub use local_asset::{FALLBACK_MIMETYPE, LocalAsset, Snapshot, join_public_path};
pub use media_id::{
    GIPHY_PREFIX, LOCAL_PREFIX, MediaId, Namespace, TENOR_PREFIX, classify, decode_local,
    encode_local,
};
