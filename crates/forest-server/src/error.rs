//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. Every
//! variant carries the correlation id of the failed request. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forest_engine::{EngineError, ErrorKind};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {message}")]
    NotFound { id: String, message: String },

    /// Invalid request (400).
    #[error("bad request: {message}")]
    BadRequest { id: String, message: String },

    /// Hierarchy constraint violated (409).
    #[error("conflict: {message}")]
    Conflict { id: String, message: String },

    /// Internal server error (500). Carries no detail by construction.
    #[error("internal error, reference id {id}")]
    Internal { id: String },
}

impl ApiError {
    /// Maps an engine error to its transport form under correlation id `id`.
    ///
    /// Store failures lose their message here; the caller is expected to
    /// have logged it under the same id.
    pub fn from_engine(id: String, err: &EngineError) -> Self {
        match (err.kind(), err) {
            (_, EngineError::InvalidName) => ApiError::BadRequest {
                id,
                message: err.to_string(),
            },
            (ErrorKind::Reference, _) => ApiError::NotFound {
                id,
                message: err.to_string(),
            },
            (ErrorKind::Constraint, _) => ApiError::Conflict {
                id,
                message: err.to_string(),
            },
            (ErrorKind::Store, _) => ApiError::Internal { id },
        }
    }

    /// Correlation id of the failed request.
    pub fn correlation_id(&self) -> &str {
        match self {
            ApiError::NotFound { id, .. }
            | ApiError::BadRequest { id, .. }
            | ApiError::Conflict { id, .. }
            | ApiError::Internal { id } => id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            ApiError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
            ApiError::Conflict { message, .. } => {
                (StatusCode::CONFLICT, "CONFLICT", message.clone())
            }
            ApiError::Internal { id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("internal server error, reference id {}", id),
            ),
        };

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message,
        };
        let body = serde_json::json!({
            "success": false,
            "id": self.correlation_id(),
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}
