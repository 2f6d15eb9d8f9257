//! OpenAPI document.

use std::sync::Arc;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use super::{apartments, health};
use crate::envelope::{
    ErrorEnvelope, HealthResponse, ListingEnvelope, ListingPageEnvelope, StoreHealth,
};
use crate::listing::{FieldError, Pagination};
use crate::models::{Listing, NewListing};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Estate API", description = "Apartment listings"),
    paths(
        apartments::list_apartments,
        apartments::create_apartment,
        apartments::get_apartment,
        health::health_check,
    ),
    components(schemas(
        Listing,
        NewListing,
        Pagination,
        ListingEnvelope,
        ListingPageEnvelope,
        ErrorEnvelope,
        FieldError,
        HealthResponse,
        StoreHealth,
    )),
    tags(
        (name = "apartments", description = "Apartment listings"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// Serve the document built once at router construction.
pub fn router() -> Router<AppState> {
    let doc = Arc::new(ApiDoc::openapi());
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { ([(header::CACHE_CONTROL, "no-store")], Json(doc.as_ref())).into_response() }
        }),
    )
}
