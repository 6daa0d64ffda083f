//! Use case implementations.

mod proxy_media_use_case;
mod resolve_media_use_case;

pub use proxy_media_use_case::{ProxyMedia, ProxyMediaUseCase};
pub use resolve_media_use_case::{
    Destinations, MediaResolver, Resolution, TEMPLATE_PLACEHOLDER, is_plain_filename,
};
