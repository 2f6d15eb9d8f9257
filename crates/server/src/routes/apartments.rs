//! Apartment REST endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::envelope::{ErrorEnvelope, ListingEnvelope, ListingPageEnvelope};
use crate::error::AppResult;
use crate::listing::ListParams;
use crate::models::NewListing;
use crate::state::AppState;

/// Create the apartments router (mounted under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apartments", get(list_apartments).post(create_apartment))
        .route("/apartments/{id}", get(get_apartment))
}

/// List apartments with filtering, sorting and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/apartments",
    tag = "apartments",
    params(ListParams),
    responses(
        (status = 200, description = "A page of apartments", body = ListingPageEnvelope),
        (status = 400, description = "Invalid query parameters", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
pub async fn list_apartments(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<ListingPageEnvelope>> {
    let Query(params) = params?;
    let service = state.listings();

    let query = service.parse_query(&params)?;
    let page = service.list(&query).await?;

    Ok(Json(ListingPageEnvelope {
        success: true,
        message: "Apartments retrieved successfully".to_string(),
        data: page.listings,
        pagination: page.pagination,
    }))
}

/// Create an apartment.
#[utoipa::path(
    post,
    path = "/api/v1/apartments",
    tag = "apartments",
    request_body = NewListing,
    responses(
        (status = 201, description = "Apartment created", body = ListingEnvelope),
        (status = 400, description = "Invalid apartment data", body = ErrorEnvelope),
        (status = 409, description = "Duplicate field value", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
pub async fn create_apartment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ListingEnvelope>)> {
    let Json(payload) = payload?;
    let listing = state.listings().create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ListingEnvelope::ok("Apartment created successfully", listing)),
    ))
}

/// Fetch one apartment by id.
#[utoipa::path(
    get,
    path = "/api/v1/apartments/{id}",
    tag = "apartments",
    params(("id" = String, Path, description = "Apartment id (UUID)")),
    responses(
        (status = 200, description = "The apartment", body = ListingEnvelope),
        (status = 400, description = "Invalid ID format", body = ErrorEnvelope),
        (status = 404, description = "Apartment not found", body = ErrorEnvelope)
    )
)]
pub async fn get_apartment(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ListingEnvelope>> {
    let Path(id) = id?;
    let listing = state.listings().get(&id).await?;
    Ok(Json(ListingEnvelope::ok(
        "Apartment retrieved successfully",
        listing,
    )))
}
