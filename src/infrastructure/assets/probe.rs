//! Content type and dimension probing for local files.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::FALLBACK_MIMETYPE;

/// Number of leading bytes inspected to sniff the content type.
pub const SNIFF_LEN: u64 = 512;

/// Errors that exclude a single file from a snapshot.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The file could not be opened or read.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file was readable but is not a decodable image.
    #[error("not a decodable image ({mimetype}): {reason}")]
    Undecodable {
        /// Content type sniffed from the header.
        mimetype: String,
        /// Decoder failure.
        reason: String,
    },
}

/// Successfully probed image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedFile {
    /// Sniffed content type.
    pub mimetype: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Sniffs a content type from leading file bytes.
#[must_use]
pub fn sniff_mimetype(header: &[u8]) -> &'static str {
    image::guess_format(header).map_or(FALLBACK_MIMETYPE, |format| format.to_mime_type())
}

/// Content type for serving a file, from its extension.
#[must_use]
pub fn mimetype_for_path(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path).map_or(FALLBACK_MIMETYPE, |format| format.to_mime_type())
}

/// Content type for serving a file.
///
/// The extension decides when it names a known image format. Otherwise the
/// leading bytes are sniffed, so extensionless uploads keep their real type.
#[must_use]
pub fn mimetype_for_file(path: &Path) -> String {
    let by_extension = mimetype_for_path(path);
    if by_extension != FALLBACK_MIMETYPE {
        return by_extension.to_string();
    }

    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    match File::open(path).and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut header)) {
        Ok(_) => sniff_mimetype(&header).to_string(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not sniff content type");
            FALLBACK_MIMETYPE.to_string()
        }
    }
}

/// Reads a file's header and image metadata without decoding pixel data.
///
/// # Errors
/// Returns `ProbeError::Io` if the file cannot be read, and
/// `ProbeError::Undecodable` if it is not a supported image.
pub fn probe_file(path: &Path) -> Result<ProbedFile, ProbeError> {
    let mut file = File::open(path)?;

    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.by_ref().take(SNIFF_LEN).read_to_end(&mut header)?;
    let mimetype = sniff_mimetype(&header).to_string();

    file.seek(SeekFrom::Start(0))?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;

    match reader.into_dimensions() {
        Ok((width, height)) => Ok(ProbedFile {
            mimetype,
            width,
            height,
        }),
        Err(e) => Err(ProbeError::Undecodable {
            mimetype,
            reason: e.to_string(),
        }),
    }
}
