//! Local asset store infrastructure.
//!
//! This module provides:
//! - Directory enumeration of the storage root
//! - MIME sniffing and dimension probing
//! - The snapshot cache shared by the listing and page endpoints

pub mod fs_lister;
pub mod local_cache;
pub mod probe;

pub use fs_lister::FsDirectoryLister;
pub use local_cache::{CacheSettings, DEFAULT_TTL, LocalAssetCache};
pub use probe::{ProbeError, ProbedFile, mimetype_for_file, mimetype_for_path, probe_file, sniff_mimetype};
