//! # API errors
//!
//! Validation failures answer 422 with field details; storage failures
//! answer 500 with a truncated message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{Event, Logger};
use crate::schema::{SchemaError, ValidationDetails};
use crate::store::StoreError;

/// Longest storage error message exposed to clients
pub const MAX_ERROR_DETAIL_CHARS: usize = 120;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body or payload rejected before reaching storage
    #[error(transparent)]
    Validation(#[from] SchemaError),

    /// Document store failed or is unavailable
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationDetails>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let code = err.status_code().as_u16();
        match err {
            ApiError::Validation(e) => Self {
                error: e.to_string(),
                code,
                details: e.details().to_vec(),
            },
            ApiError::Storage(e) => Self {
                error: truncate(&e.to_string(), MAX_ERROR_DETAIL_CHARS),
                code,
                details: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self);
        match &self {
            ApiError::Validation(e) => {
                let fields = e.fields().join(",");
                Logger::warn(
                    Event::ValidationRejected.as_str(),
                    &[("fields", fields.as_str()), ("reason", body.error.as_str())],
                );
            }
            ApiError::Storage(e) => {
                Logger::error(Event::StorageFailed.as_str(), &[("reason", e.to_string().as_str())]);
            }
        }
        (self.status_code(), Json(body)).into_response()
    }
}

/// Cut `s` to at most `max` characters
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
