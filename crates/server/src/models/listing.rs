//! Listing record.
//!
//! A listing is a single apartment offered on the site. Records are created
//! once and never mutated; the store assigns the identifier and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing record as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique identifier (UUIDv7), assigned on creation.
    pub id: Uuid,

    /// Headline shown on cards and the detail page.
    pub title: String,

    /// Floor area in square meters.
    pub size: f64,

    /// Asking price.
    pub price: f64,

    /// Free-form location (district, city).
    pub location: String,

    /// Long description.
    pub description: String,

    /// Primary image reference.
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,

    /// Gallery image references, in display order.
    #[serde(rename = "imagesURLs")]
    pub images_urls: Vec<String>,

    /// When the store created the record.
    pub created_at: DateTime<Utc>,

    /// When the store last modified the record.
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload.
///
/// Produced by [`crate::listing::validate_new_listing`]; stores persist it
/// as-is.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    pub size: f64,
    pub price: f64,
    pub location: String,
    pub description: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
    #[serde(rename = "imagesURLs")]
    pub images_urls: Vec<String>,
}

impl Listing {
    /// Build a record from a validated payload with store-assigned metadata.
    pub fn from_new(id: Uuid, input: NewListing, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            size: input.size,
            price: input.price,
            location: input.location,
            description: input.description,
            thumbnail_url: input.thumbnail_url,
            images_urls: input.images_urls,
            created_at: now,
            updated_at: now,
        }
    }

    /// Image to show on listing cards: the thumbnail, else the first gallery
    /// image.
    pub fn cover_image(&self) -> Option<&str> {
        if !self.thumbnail_url.is_empty() {
            return Some(&self.thumbnail_url);
        }
        self.images_urls.first().map(String::as_str)
    }
}
