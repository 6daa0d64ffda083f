//! Stickerproxy - media identifier resolution for a federated sticker picker.
//!
//! This crate turns opaque picker identifiers into either redirects to the
//! remote GIF providers or contained paths in a local sticker directory, and
//! keeps a cached listing of that directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing filesystem and configuration adapters.
pub mod infrastructure;
/// Presentation layer containing endpoint handlers.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "stickerproxy";
