//! Application error types.
//!
//! [`AppError`] is the single place where failures become HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;
use crate::listing::ValidationErrors;
use crate::store::StoreError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}: {errors}")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("store error")]
    Store(#[source] StoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Duplicate(constraint) => AppError::Duplicate(constraint),
            other => AppError::Store(other),
        }
    }
}

/// Diagnostic information attached to error responses as an extension.
///
/// The development-mode middleware copies it into the JSON body; in
/// production it is dropped.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// Variant name, e.g. `NotFound`.
    pub kind: &'static str,
    /// Display of the error and every source, joined with `: `.
    pub chain: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidId(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidId(_) => "InvalidId",
            AppError::Duplicate(_) => "DuplicateKey",
            AppError::BadRequest(_) => "BadRequest",
            AppError::PayloadTooLarge => "PayloadTooLarge",
            AppError::Internal(_) => "Internal",
            AppError::Store(_) => "StoreError",
        }
    }

    fn chain(&self) -> String {
        match self {
            AppError::Internal(e) => format!("{e:#}"),
            _ => {
                let mut parts = vec![self.to_string()];
                let mut source = std::error::Error::source(self);
                while let Some(err) = source {
                    parts.push(err.to_string());
                    source = err.source();
                }
                parts.join(": ")
            }
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        match self {
            AppError::Validation { message, errors } => {
                ErrorEnvelope::new(message.clone(), Some(json!({ "details": errors.details })))
            }
            AppError::NotFound(message) => ErrorEnvelope::new(message.clone(), None),
            AppError::InvalidId(_) => ErrorEnvelope::new("Invalid ID format", None),
            AppError::Duplicate(_) => ErrorEnvelope::new("Duplicate field value", None),
            AppError::BadRequest(message) => ErrorEnvelope::new(message.clone(), None),
            AppError::PayloadTooLarge => ErrorEnvelope::new("Request body too large", None),
            AppError::Internal(_) | AppError::Store(_) => {
                ErrorEnvelope::new("Internal Server Error", None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = ErrorDetails {
            kind: self.kind(),
            chain: self.chain(),
        };

        match &self {
            AppError::Internal(_) | AppError::Store(_) => {
                tracing::error!(error = %details.chain, "internal server error");
            }
            AppError::Duplicate(constraint) => {
                tracing::warn!(constraint = %constraint, "duplicate key");
            }
            _ => {}
        }

        let mut response = (status, Json(self.envelope())).into_response();
        response.extensions_mut().insert(details);
        response
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
