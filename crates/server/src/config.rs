//! Configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::listing::PageLimits;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("APP_ENV must be development or production, got {other:?}"),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

/// Which listing store to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be postgres or memory, got {other:?}"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Deployment environment (default: development).
    pub environment: Environment,

    /// Listing store backend (default: postgres).
    pub store_backend: StoreBackend,

    /// PostgreSQL connection URL. Required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// How long to wait for a pooled connection (default: 5s).
    pub database_acquire_timeout: Duration,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Maximum request body size in bytes (default: 10 MiB).
    pub body_limit_bytes: usize,

    /// Page size when the client sends none (default: 10).
    pub default_page_size: u32,

    /// Largest page size a client may request (default: 100).
    pub max_page_size: u32,

    /// Path to the template directory (default: ./templates).
    pub templates_dir: PathBuf,
}

impl Default for Config {
    /// In-memory development configuration, used by tests.
    fn default() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 10,
            database_acquire_timeout: Duration::from_secs(5),
            cors_allowed_origins: vec!["*".to_string()],
            body_limit_bytes: 10 * 1024 * 1024,
            default_page_size: 10,
            max_page_size: 100,
            templates_dir: PathBuf::from("./templates"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000")
            .parse()
            .context("PORT must be a valid u16")?;

        let environment = var("APP_ENV", "development").parse()?;
        let store_backend = var("STORE_BACKEND", "postgres").parse()?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable is required when STORE_BACKEND=postgres");
        }

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let database_acquire_timeout = var("DATABASE_ACQUIRE_TIMEOUT_SECS", "5")
            .parse()
            .map(Duration::from_secs)
            .context("DATABASE_ACQUIRE_TIMEOUT_SECS must be a whole number of seconds")?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let body_limit_bytes = var("BODY_LIMIT_BYTES", "10485760")
            .parse()
            .context("BODY_LIMIT_BYTES must be a valid size in bytes")?;

        let default_page_size: u32 = var("DEFAULT_PAGE_SIZE", "10")
            .parse()
            .context("DEFAULT_PAGE_SIZE must be a valid u32")?;

        let max_page_size: u32 = var("MAX_PAGE_SIZE", "100")
            .parse()
            .context("MAX_PAGE_SIZE must be a valid u32")?;

        if default_page_size == 0 || max_page_size == 0 {
            bail!("DEFAULT_PAGE_SIZE and MAX_PAGE_SIZE must be at least 1");
        }
        if default_page_size > max_page_size {
            bail!("DEFAULT_PAGE_SIZE ({default_page_size}) exceeds MAX_PAGE_SIZE ({max_page_size})");
        }

        let templates_dir = PathBuf::from(var("TEMPLATES_DIR", "./templates"));

        Ok(Self {
            port,
            environment,
            store_backend,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            cors_allowed_origins,
            body_limit_bytes,
            default_page_size,
            max_page_size,
            templates_dir,
        })
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }
}
