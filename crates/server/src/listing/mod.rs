//! Listing domain: query construction, payload validation and the service
//! that ties them to a store.

mod query;
mod service;
mod validate;

pub use query::{
    DEFAULT_PAGE, ListParams, ListingFilter, ListingQuery, ListingSort, PageLimits, PageRequest,
    Pagination, SortDirection, SortField, TitleMatch,
};
pub use service::{ListingPage, ListingService};
pub use validate::{FieldError, ValidationErrors, validate_new_listing};
