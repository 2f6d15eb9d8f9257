//! HTTP middleware.

mod error_detail;

pub use error_detail::expose_error_details;
