//! Health check endpoint.
//!
//! Returns 200 OK if the listing store answers, 503 Service Unavailable
//! otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::envelope::{HealthResponse, StoreHealth};
use crate::state::AppState;

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and store are up", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.listings().store();
    let healthy = store.healthy().await;

    let (status_code, message) = if healthy {
        (StatusCode::OK, "Server is running")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
    };

    (
        status_code,
        Json(HealthResponse {
            success: healthy,
            message: message.to_string(),
            timestamp: Utc::now(),
            uptime: state.uptime(),
            store: StoreHealth {
                backend: store.backend().to_string(),
                healthy,
            },
        }),
    )
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
