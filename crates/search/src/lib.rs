//! Business search: normalization core and two-tier dispatch.
//!
//! Turns the model's free-form reply (a JSON array with loosely spelled
//! keys, or legacy CSV with the Turkish header row) into a fixed table of
//! [`Business`] records, and drives the retry/fallback strategy across the
//! fast and deep model variants.

pub mod dispatcher;
pub mod export;
pub mod normalize;
pub mod record;
pub mod sort;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use dispatcher::{find_businesses, SearchOptions, SearchOutcome};
pub use normalize::normalize_response;
pub use record::{Business, Field, NOT_AVAILABLE};
pub use sort::sort_records;
