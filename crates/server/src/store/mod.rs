//! Listing persistence.
//!
//! The [`ListingStore`] trait is the only seam between request handling and
//! storage. Two backends implement it: PostgreSQL for deployments and an
//! in-process store for tests and local development.

mod memory;
mod postgres;
pub mod query_builder;

pub use memory::MemoryListingStore;
pub use postgres::PgListingStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::listing::{ListingFilter, ListingSort};
use crate::models::{Listing, NewListing};

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate key violates constraint {0}")]
    Duplicate(String),

    /// The backend could not be reached in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.constraint().unwrap_or("unknown").to_string())
            }
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("connection pool timed out".to_string())
            }
            _ => StoreError::Database(error),
        }
    }
}

/// Listing collection operations.
///
/// `find` and `count` take the same filter and are independent reads; callers
/// that run them concurrently get no snapshot guarantee between the two.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Persist a validated listing, assigning id and timestamps.
    async fn create(&self, listing: NewListing) -> Result<Listing, StoreError>;

    /// Matching listings in sort order, skipping `skip` and returning at most
    /// `limit`.
    async fn find(
        &self,
        filter: &ListingFilter,
        sort: &ListingSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Listing>, StoreError>;

    /// Number of listings matching `filter`.
    async fn count(&self, filter: &ListingFilter) -> Result<u64, StoreError>;

    /// Look up a single listing.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError>;

    /// Whether the backend currently answers.
    async fn healthy(&self) -> bool;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Release backend resources on shutdown.
    async fn close(&self) {}
}
