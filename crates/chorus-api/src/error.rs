//! API error types and JSON error response formatting.
//!
//! ApiError gives every JSON endpoint the same error body and maps chat and
//! storage failures to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chorus_chat::ChatError;
use chorus_core::error::ChorusError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    #[error("{0}")]
    BadRequest(String),
    /// 404 Not Found - unknown bot id.
    #[error("{0}")]
    NotFound(String),
    /// 500 Internal Server Error - storage or task failure.
    #[error("{0}")]
    Internal(String),
    /// 504 Gateway Timeout - a bounded operation ran out of time.
    #[error("{0}")]
    Timeout(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChorusError> for ApiError {
    fn from(err: ChorusError) -> Self {
        match &err {
            ChorusError::Config(msg) => ApiError::BadRequest(msg.clone()),
            ChorusError::Storage(msg) => ApiError::Internal(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ChatError::BotNotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::Timeout(_) => ApiError::Timeout(err.to_string()),
            ChatError::StorageError(_) | ChatError::TaskFailed(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
