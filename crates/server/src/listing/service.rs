//! Listing service.
//!
//! Owns the store handle and the page-size policy, and is the only caller of
//! [`ListingStore`] outside of tests.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::query::{ListParams, ListingQuery, PageLimits, Pagination};
use super::validate::validate_new_listing;
use crate::error::{AppError, AppResult};
use crate::models::Listing;
use crate::store::ListingStore;

/// One page of listings with its metadata.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub pagination: Pagination,
}

/// Service for listing reads and creation.
pub struct ListingService {
    store: Arc<dyn ListingStore>,
    limits: PageLimits,
}

impl ListingService {
    /// Create a new ListingService.
    pub fn new(store: Arc<dyn ListingStore>, limits: PageLimits) -> Arc<Self> {
        Arc::new(Self { store, limits })
    }

    pub fn store(&self) -> &Arc<dyn ListingStore> {
        &self.store
    }

    /// Resolve raw query parameters against this service's page limits.
    pub fn parse_query(&self, params: &ListParams) -> AppResult<ListingQuery> {
        ListingQuery::from_params(params, &self.limits).map_err(|errors| AppError::Validation {
            message: "Invalid query parameters".to_string(),
            errors,
        })
    }

    /// Fetch one page and the total match count.
    ///
    /// Both reads run concurrently against the same filter; they are not a
    /// snapshot, so a concurrent create can make them disagree by one.
    pub async fn list(&self, query: &ListingQuery) -> AppResult<ListingPage> {
        let skip = query.page.skip();
        let limit = u64::from(query.page.limit);

        let (listings, total) = tokio::try_join!(
            self.store.find(&query.filter, &query.sort, skip, limit),
            self.store.count(&query.filter),
        )?;

        debug!(
            page = query.page.page,
            limit = query.page.limit,
            total,
            returned = listings.len(),
            "listings fetched"
        );

        Ok(ListingPage {
            listings,
            pagination: Pagination::new(query.page, total),
        })
    }

    /// Validate a raw creation payload and persist it.
    ///
    /// Nothing reaches the store unless the whole payload is valid.
    pub async fn create(&self, payload: &Value) -> AppResult<Listing> {
        let input = validate_new_listing(payload).map_err(|errors| AppError::Validation {
            message: "Invalid apartment data".to_string(),
            errors,
        })?;

        let listing = self.store.create(input).await?;
        info!(listing_id = %listing.id, title = %listing.title, "listing created");
        Ok(listing)
    }

    /// Fetch a listing by its textual identifier.
    pub async fn get(&self, id: &str) -> AppResult<Listing> {
        let id = Uuid::parse_str(id.trim())
            .map_err(|_| AppError::InvalidId(id.to_string()))?;

        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Apartment not found".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::MemoryListingStore;
    use serde_json::json;

    fn payload(title: &str) -> Value {
        json!({
            "title": title,
            "size": 10,
            "price": 100,
            "location": "L",
            "description": "D",
            "thumbnailURL": "t",
            "imagesURLs": []
        })
    }

    fn service() -> (Arc<MemoryListingStore>, Arc<ListingService>) {
        let store = Arc::new(MemoryListingStore::new());
        let service = ListingService::new(store.clone(), PageLimits::default());
        (store, service)
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_, service) = service();
        let created = service.create(&payload("A")).await.unwrap();
        let fetched = service.get(&created.id.to_string()).await.unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn invalid_payload_is_not_persisted() {
        let (store, service) = service();
        let err = service.create(&json!({"title": "A"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_is_distinct_from_missing() {
        let (_, service) = service();
        assert!(matches!(
            service.get("not-a-uuid").await.unwrap_err(),
            AppError::InvalidId(_)
        ));
        assert!(matches!(
            service.get(&Uuid::now_v7().to_string()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn last_page_of_twenty_five() {
        let (_, service) = service();
        for i in 0..25 {
            service.create(&payload(&format!("Flat {i}"))).await.unwrap();
        }

        let query = service
            .parse_query(&ListParams {
                page: Some("3".to_string()),
                limit: Some("10".to_string()),
                ..Default::default()
            })
            .unwrap();
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.listings.len(), 5);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn bad_query_maps_to_validation_error() {
        let (_, service) = service();
        let err = service
            .parse_query(&ListParams {
                limit: Some("0".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        match err {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "Invalid query parameters");
                assert!(errors.has_field("limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
