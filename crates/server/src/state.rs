//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::listing::ListingService;
use crate::store::{ListingStore, MemoryListingStore, PgListingStore};
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Loaded configuration.
    config: Config,

    /// Listing service over the configured store.
    listings: Arc<ListingService>,

    /// Theme engine for the HTML pages.
    theme: Arc<ThemeEngine>,

    /// Process start, for the health endpoint.
    started_at: Instant,
}

impl AppState {
    /// Build state for `config`, connecting the configured store.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn ListingStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres store")?;
                Arc::new(
                    PgListingStore::connect(
                        url,
                        config.database_max_connections,
                        config.database_acquire_timeout,
                    )
                    .await?,
                )
            }
            StoreBackend::Memory => Arc::new(MemoryListingStore::new()),
        };
        info!(backend = store.backend(), "listing store initialized");

        Self::with_store(config.clone(), store)
    }

    /// Build state around an already constructed store.
    pub fn with_store(config: Config, store: Arc<dyn ListingStore>) -> Result<Self> {
        let theme = ThemeEngine::new(&config.templates_dir)?;
        info!(dir = %config.templates_dir.display(), "templates loaded");

        let listings = ListingService::new(store, config.page_limits());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                listings,
                theme: Arc::new(theme),
                started_at: Instant::now(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn listings(&self) -> &Arc<ListingService> {
        &self.inner.listings
    }

    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Seconds since the state was built.
    pub fn uptime(&self) -> f64 {
        self.inner.started_at.elapsed().as_secs_f64()
    }

    /// Release store resources.
    pub async fn shutdown(&self) {
        self.inner.listings.store().close().await;
        info!("application state shut down");
    }
}
