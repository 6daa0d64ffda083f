//! Media identifiers and the local filename codec.
//!
//! Every identifier the picker hands out carries a two character namespace
//! prefix:
//! - `g-<key>` Giphy content key
//! - `t-<key>` Tenor content key
//! - `l-<payload>` unpadded URL-safe base64 of a file in the local store
//!
//! Anything else is [`MediaId::Invalid`]. Parsing never fails; a malformed
//! local payload is only detected when it is decoded.

use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use regex::Regex;

use crate::domain::errors::DecodeError;

/// Prefix of Giphy identifiers.
pub const GIPHY_PREFIX: &str = "g-";
/// Prefix of Tenor identifiers.
pub const TENOR_PREFIX: &str = "t-";
/// Prefix of local store identifiers.
pub const LOCAL_PREFIX: &str = "l-";

static GIPHY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^g-[a-zA-Z0-9_-]+$").expect("valid giphy id pattern"));

static TENOR_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t-[a-zA-Z0-9_-]+$").expect("valid tenor id pattern"));

// Accepts the standard alphabet too, so `+`, `/` and `=` reach the decoder and
// are reported as a bad encoding rather than an unknown namespace.
static LOCAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^l-[a-zA-Z0-9+/=_-]+$").expect("valid local id pattern"));

/// Identifier namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Giphy.
    Giphy,
    /// Tenor.
    Tenor,
    /// Local file store.
    Local,
    /// Not a recognised identifier.
    Invalid,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Giphy => write!(f, "giphy"),
            Self::Tenor => write!(f, "tenor"),
            Self::Local => write!(f, "local"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// A classified media identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaId {
    /// Giphy content key, prefix stripped.
    Giphy(String),
    /// Tenor content key, prefix stripped.
    Tenor(String),
    /// Encoded local filename, prefix stripped.
    Local(String),
    /// The raw input, which matched no namespace.
    Invalid(String),
}

impl MediaId {
    /// Classifies a raw identifier string. Total and pure.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if GIPHY_ID_RE.is_match(raw) {
            Self::Giphy(raw[GIPHY_PREFIX.len()..].to_string())
        } else if TENOR_ID_RE.is_match(raw) {
            Self::Tenor(raw[TENOR_PREFIX.len()..].to_string())
        } else if LOCAL_ID_RE.is_match(raw) {
            Self::Local(raw[LOCAL_PREFIX.len()..].to_string())
        } else {
            Self::Invalid(raw.to_string())
        }
    }

    /// Builds the local identifier for a filename.
    #[must_use]
    pub fn for_local_file(filename: &str) -> Self {
        Self::Local(URL_SAFE_NO_PAD.encode(filename.as_bytes()))
    }

    /// Returns the namespace of this identifier.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::Giphy(_) => Namespace::Giphy,
            Self::Tenor(_) => Namespace::Tenor,
            Self::Local(_) => Namespace::Local,
            Self::Invalid(_) => Namespace::Invalid,
        }
    }

    /// Decodes the filename of a local identifier.
    ///
    /// # Errors
    /// Returns `DecodeError` if this is not a local identifier, or its payload
    /// is not unpadded URL-safe base64 of a UTF-8 string.
    pub fn decode_local(&self) -> Result<String, DecodeError> {
        match self {
            Self::Local(payload) => decode_local(payload),
            other => Err(DecodeError::NotLocal(other.namespace())),
        }
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Giphy(key) => write!(f, "{GIPHY_PREFIX}{key}"),
            Self::Tenor(key) => write!(f, "{TENOR_PREFIX}{key}"),
            Self::Local(payload) => write!(f, "{LOCAL_PREFIX}{payload}"),
            Self::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<&str> for MediaId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Classifies a raw identifier string.
#[must_use]
pub fn classify(raw: &str) -> Namespace {
    MediaId::parse(raw).namespace()
}

/// Encodes a filename into its `l-` identifier string.
#[must_use]
pub fn encode_local(filename: &str) -> String {
    MediaId::for_local_file(filename).to_string()
}

/// Decodes a local payload (without the `l-` prefix) back into a filename.
///
/// # Errors
/// Returns `DecodeError` if the payload is not valid unpadded URL-safe base64,
/// or does not decode to UTF-8.
pub fn decode_local(payload: &str) -> Result<String, DecodeError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| DecodeError::NotUtf8)
}
