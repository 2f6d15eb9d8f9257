//! PostgreSQL listing store.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use super::query_builder::ListingQueryBuilder;
use super::{ListingStore, StoreError};
use crate::listing::{ListingFilter, ListingSort};
use crate::models::{Listing, NewListing};

const LISTING_SELECT: &str = "SELECT id, title, size, price, location, description, thumbnail_url, images_urls, created_at, updated_at FROM listing";

/// Listing store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and bring the schema up to date.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .context("failed to connect to PostgreSQL")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;

        info!(max_connections, "PostgreSQL listing store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn create(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let created = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listing (id, title, size, price, location, description, thumbnail_url, images_urls)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, size, price, location, description, thumbnail_url, images_urls, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&listing.title)
        .bind(listing.size)
        .bind(listing.price)
        .bind(&listing.location)
        .bind(&listing.description)
        .bind(&listing.thumbnail_url)
        .bind(&listing.images_urls)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find(
        &self,
        filter: &ListingFilter,
        sort: &ListingSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Listing>, StoreError> {
        let sql = ListingQueryBuilder::new(filter, sort).build(skip, limit);
        let rows = sqlx::query_as::<_, Listing>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, filter: &ListingFilter) -> Result<u64, StoreError> {
        let sql = ListingQueryBuilder::new(filter, &ListingSort::default()).build_count();
        let total: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        let listing = sqlx::query_as::<_, Listing>(&format!("{LISTING_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}
