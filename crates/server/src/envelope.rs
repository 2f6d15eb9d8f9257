//! Uniform JSON response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::listing::Pagination;
use crate::models::Listing;

/// `{ success, message, data }` wrapper around a single listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Listing,
}

impl ListingEnvelope {
    pub fn ok(message: &str, data: Listing) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
        }
    }
}

/// Page of listings plus pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingPageEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Vec<Listing>,
    pub pagination: Pagination,
}

/// Failure body.
///
/// `error` and `detail` are only filled in development mode.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
            error: None,
            detail: None,
        }
    }
}

/// Health probe body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup.
    pub uptime: f64,
    /// Store backend name and whether it answered.
    pub store: StoreHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub backend: String,
    pub healthy: bool,
}
