//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{LocalAsset, MediaId, Namespace, Snapshot};
pub use errors::{CacheError, DecodeError, ProxyError, ResolveError};
pub use ports::{Clock, DirectoryLister, SystemClock};
