//! Error handling for the shelf HTTP layer
//!
//! Missing fields and unknown books are part of the endpoint contract and are
//! answered as plain text by the handlers themselves. `AppError` covers input
//! no backend can store and unexpected infrastructure failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

const GENERIC_MESSAGE: &str = "An internal server error occurred";

/// Standard error envelope for server errors
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Vec<serde_json::Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();

        let (status, code, message) = match self {
            AppError::BadRequest { message, code } => {
                tracing::warn!(
                    error_id = %error_id,
                    error_code = %code,
                    error = %message,
                    "rejected request"
                );
                (StatusCode::BAD_REQUEST, code, message)
            }
            AppError::Internal(e) => {
                let cause = format!("{e:#}");
                tracing::error!(
                    error_id = %error_id,
                    error_code = "internal_error",
                    status_code = %StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    error = %cause,
                    "request error"
                );

                // Release builds never leak the underlying cause to the caller
                let message = if cfg!(debug_assertions) {
                    cause
                } else {
                    GENERIC_MESSAGE.to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    message,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details: Vec::new(),
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        (status, Json(body)).into_response()
    }
}
