//! Error types shared across the ingestion pipeline.
//!
//! - [`AppError`] is what HTTP handlers and the public `record_*` entry points
//!   return for problems that must surface synchronously (validation, auth).
//! - [`DispatchError`] describes a single failed destination write. It never
//!   aborts sibling writes; it is carried inside a
//!   [`crate::application::services::dispatcher::DestinationOutcome`].

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Failure of one destination write during dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Input rejected before any write was issued.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Transport-level failure talking to the event store (connect, timeout, decode).
    #[error("event store request failed: {0}")]
    EventStore(String),

    /// The event store answered with a non-success status.
    #[error("event store rejected the record with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The event store acknowledged the request but quarantined every row.
    #[error("event store quarantined {quarantined_rows} row(s)")]
    Quarantined { quarantined_rows: u64 },

    #[error("database error: {0}")]
    Database(String),

    /// The write task panicked or was aborted by the runtime.
    #[error("write task failed: {0}")]
    TaskFailed(String),
}

impl From<sqlx::Error> for DispatchError {
    fn from(e: sqlx::Error) -> Self {
        DispatchError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        DispatchError::EventStore(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(e))
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Validation(message) => AppError::bad_request(message, json!({})),
            other => AppError::internal(
                "Event store write failed",
                json!({ "reason": other.to_string() }),
            ),
        }
    }
}
