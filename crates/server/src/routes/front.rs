//! Server-rendered listing pages.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use axum::routing::get;
use serde::Deserialize;
use tracing::error;

use crate::error::AppError;
use crate::listing::ListParams;
use crate::state::AppState;

/// Cards per page on the grid.
const GRID_PAGE_SIZE: &str = "12";

/// Query accepted by the grid page.
#[derive(Debug, Default, Deserialize)]
pub struct GridParams {
    pub page: Option<String>,
    pub search: Option<String>,
}

/// Create the front-end router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings_page))
        .route("/property/{id}", get(listing_page))
}

/// Grid of listings with search box and pager.
async fn listings_page(
    State(state): State<AppState>,
    params: Result<Query<GridParams>, QueryRejection>,
) -> Response {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let service = state.listings();
    let list_params = ListParams {
        page: params.page,
        limit: Some(GRID_PAGE_SIZE.to_string()),
        search: Some(search.clone()),
        ..Default::default()
    };
    // A bad page number shows the first page rather than an error.
    let query = match service.parse_query(&list_params) {
        Ok(query) => query,
        Err(_) => match service.parse_query(&ListParams {
            page: None,
            ..list_params
        }) {
            Ok(query) => query,
            Err(e) => return error_page(&state, &e),
        },
    };

    let page = match service.list(&query).await {
        Ok(page) => page,
        Err(e) => return error_page(&state, &e),
    };

    let mut context = tera::Context::new();
    context.insert("title", "Apartments");
    context.insert("listings", &page.listings);
    context.insert("pagination", &page.pagination);
    context.insert("search", &search);

    render(&state, StatusCode::OK, "listings.html", &context)
}

/// Detail page for one listing.
async fn listing_page(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return error_page(&state, &AppError::from(rejection)),
    };
    let listing = match state.listings().get(&id).await {
        Ok(listing) => listing,
        Err(e) => return error_page(&state, &e),
    };

    let mut context = tera::Context::new();
    context.insert("title", &listing.title);
    context.insert("listing", &listing);
    context.insert("cover", &listing.cover_image());

    render(&state, StatusCode::OK, "listing.html", &context)
}

/// HTML counterpart of the JSON error envelope.
fn error_page(state: &AppState, err: &AppError) -> Response {
    let (status, heading, message) = match err {
        AppError::NotFound(_) | AppError::InvalidId(_) | AppError::BadRequest(_) => (
            StatusCode::NOT_FOUND,
            "Property not found",
            "The requested property could not be found.",
        ),
        _ => {
            error!(error = %err, "page rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "Please try again later.",
            )
        }
    };

    let mut context = tera::Context::new();
    context.insert("title", heading);
    context.insert("heading", heading);
    context.insert("message", message);

    render(state, status, "not_found.html", &context)
}

fn render(state: &AppState, status: StatusCode, template: &str, context: &tera::Context) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %format!("{e:#}"), template, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
