//! Domain error types.

mod cache_error;
mod resolve_error;

pub use cache_error::CacheError;
pub use resolve_error::{DecodeError, INVALID_ID_MESSAGE, ProxyError, ResolveError};
