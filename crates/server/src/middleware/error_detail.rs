//! Development-mode error detail.
//!
//! Error responses carry an [`ErrorDetails`] extension. In development the
//! kind and full error chain are merged into the JSON envelope as `error` and
//! `detail`; in production the body is passed through untouched.

use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::warn;

use crate::error::ErrorDetails;
use crate::state::AppState;

/// Error envelopes are small; a larger body is dropped and only the status
/// and headers are kept.
const MAX_ERROR_BODY: usize = 64 * 1024;

pub async fn expose_error_details(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config().environment.is_development() {
        return response;
    }
    let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "could not buffer error body");
            parts.headers.remove(header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(mut envelope) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    let Some(object) = envelope.as_object_mut() else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    object.insert("error".to_string(), Value::String(details.kind.to_string()));
    object.insert("detail".to_string(), Value::String(details.chain));

    match serde_json::to_vec(&envelope) {
        Ok(body) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}
