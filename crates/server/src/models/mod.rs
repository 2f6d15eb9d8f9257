//! Persisted records.

pub mod listing;

pub use listing::{Listing, NewListing};
