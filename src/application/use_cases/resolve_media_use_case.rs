//! Media identifier resolution.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::MediaId;
use crate::domain::errors::ResolveError;
use crate::infrastructure::assets::mimetype_for_file;

/// Placeholder replaced by the content key in redirect templates.
pub const TEMPLATE_PLACEHOLDER: &str = "%s";

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect the client to a remote provider.
    Redirect {
        /// Target URL.
        url: String,
    },
    /// Serve a validated file from the storage root.
    LocalFile {
        /// Canonical path inside the storage root.
        path: PathBuf,
        /// Content type to serve the file with.
        mimetype: String,
    },
}

/// Redirect templates for the remote providers.
#[derive(Debug, Clone)]
pub struct Destinations {
    /// Giphy template.
    pub giphy: String,
    /// Tenor template.
    pub tenor: String,
}

impl Destinations {
    /// Builds the redirect URL for a remote identifier.
    #[must_use]
    pub fn redirect_url(&self, id: &MediaId) -> Option<String> {
        match id {
            MediaId::Giphy(key) => Some(fill_template(&self.giphy, key)),
            MediaId::Tenor(key) => Some(fill_template(&self.tenor, key)),
            MediaId::Local(_) | MediaId::Invalid(_) => None,
        }
    }
}

/// Resolves identifiers into redirects or contained local paths.
///
/// Containment is checked on every call against the live filesystem; nothing
/// is taken from the asset cache.
pub struct MediaResolver {
    destinations: Destinations,
    storage_root: PathBuf,
}

impl MediaResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(destinations: Destinations, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            destinations,
            storage_root: storage_root.into(),
        }
    }

    /// Returns the redirect templates.
    #[must_use]
    pub const fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    /// Resolves a raw identifier string.
    ///
    /// # Errors
    /// See [`resolve_id`](Self::resolve_id).
    pub fn resolve(&self, raw: &str) -> Result<Resolution, ResolveError> {
        self.resolve_id(&MediaId::parse(raw))
    }

    /// Resolves a classified identifier.
    ///
    /// # Errors
    /// Returns `InvalidIdentifier`, `Decode` or `PathEscape` for bad input,
    /// `NotFound` if a contained local file does not exist, and `Storage`
    /// if the storage root itself is unavailable.
    pub fn resolve_id(&self, id: &MediaId) -> Result<Resolution, ResolveError> {
        match id {
            MediaId::Giphy(_) | MediaId::Tenor(_) => {
                let url = self
                    .destinations
                    .redirect_url(id)
                    .ok_or_else(|| ResolveError::invalid(id.to_string()))?;
                debug!(id = %id, url = %url, "Resolved remote media");
                Ok(Resolution::Redirect { url })
            }
            MediaId::Local(_) => {
                let path = self.resolve_local(id)?;
                let mimetype = mimetype_for_file(&path);
                Ok(Resolution::LocalFile { path, mimetype })
            }
            MediaId::Invalid(raw) => Err(ResolveError::invalid(raw.clone())),
        }
    }

    fn resolve_local(&self, id: &MediaId) -> Result<PathBuf, ResolveError> {
        let raw = id.to_string();
        let filename = id.decode_local().map_err(|source| ResolveError::Decode {
            raw: raw.clone(),
            source,
        })?;

        if !is_plain_filename(&filename) {
            warn!(id = %raw, filename = ?filename, "Rejected local identifier outside storage root");
            return Err(ResolveError::path_escape(raw, filename));
        }

        let root = fs::canonicalize(&self.storage_root).map_err(|source| ResolveError::Storage {
            path: self.storage_root.clone(),
            source,
        })?;

        let candidate = match fs::canonicalize(root.join(&filename)) {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ResolveError::NotFound { raw });
            }
            Err(source) => {
                return Err(ResolveError::Storage {
                    path: root.join(&filename),
                    source,
                });
            }
        };

        if !candidate.starts_with(&root) {
            warn!(
                id = %raw,
                filename = ?filename,
                target = %candidate.display(),
                "Rejected local identifier resolving outside storage root"
            );
            return Err(ResolveError::path_escape(raw, filename));
        }

        if !candidate.is_file() {
            return Err(ResolveError::NotFound { raw });
        }

        debug!(id = %raw, path = %candidate.display(), "Resolved local media");
        Ok(candidate)
    }
}

/// Returns true if `name` is a single, ordinary path component.
///
/// `\` is a separator only on Windows; elsewhere it is an ordinary filename
/// character and files containing it are listed and served.
#[must_use]
pub fn is_plain_filename(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\0']) {
        return false;
    }
    if cfg!(windows) && name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn fill_template(template: &str, key: &str) -> String {
    template.replacen(TEMPLATE_PLACEHOLDER, key, 1)
}
