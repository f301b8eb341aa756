//! Common API response wrapper types.
//!
//! [`ApiResponse`] is the standard envelope for all successful API
//! responses. Error responses are produced by
//! [`ApiError`](crate::error::ApiError) with the same `success` / `id` keys.

use serde::Serialize;

/// Standard API response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// Correlation id of this request.
    pub id: String,
    /// Human-readable summary of what happened.
    pub message: String,
    /// Response payload; absent for operations that return nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn ok(id: String, message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            id,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response with no payload.
    pub fn done(id: String, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            id,
            message: message.into(),
            data: None,
        }
    }
}
