//! Data transfer objects.

mod listing_dto;
mod page_dto;

pub use listing_dto::{ListingRecord, listing_records};
pub use page_dto::PickerPageContext;
