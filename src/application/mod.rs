//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ListingRecord, PickerPageContext, listing_records};
pub use use_cases::{Destinations, MediaResolver, ProxyMedia, ProxyMediaUseCase, Resolution};
