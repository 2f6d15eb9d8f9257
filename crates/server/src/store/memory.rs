//! In-process listing store.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ListingStore, StoreError};
use crate::listing::{ListingFilter, ListingSort};
use crate::models::{Listing, NewListing};

/// Listing store kept in memory.
///
/// Records are held in insertion order, and sorting is stable, so listings
/// with equal sort keys come back oldest-inserted first.
#[derive(Default)]
pub struct MemoryListingStore {
    listings: RwLock<Vec<Listing>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            listings: RwLock::new(listings),
        }
    }

    pub fn len(&self) -> usize {
        self.listings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.read().is_empty()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn create(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let record = Listing::from_new(Uuid::now_v7(), listing, Utc::now());
        let mut listings = self.listings.write();
        if listings.iter().any(|l| l.id == record.id) {
            return Err(StoreError::Duplicate("listing_pkey".to_string()));
        }
        listings.push(record.clone());
        Ok(record)
    }

    async fn find(
        &self,
        filter: &ListingFilter,
        sort: &ListingSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Listing>, StoreError> {
        let listings = self.listings.read();
        let mut matched: Vec<&Listing> = listings.iter().filter(|l| filter.matches(l)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, StoreError> {
        let listings = self.listings.read();
        Ok(listings.iter().filter(|l| filter.matches(l)).count() as u64)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        Ok(self.listings.read().iter().find(|l| l.id == id).cloned())
    }

    async fn healthy(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
