//! Error type system for the restaurants service
//!
//! Every failure a handler can produce is one of these variants. The
//! translation to an HTTP response happens in one place (`IntoResponse`),
//! and server-side failures never expose their detail to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body message returned for any rejected create/update payload
pub const VALIDATION_MESSAGE: &str = "name, cuisine, and numeric rating are required";

/// Body message returned when no restaurant matches the requested id
pub const NOT_FOUND_MESSAGE: &str = "Restaurant not found";

/// Body message returned for every store or server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Main error type for the restaurants service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_)
            | ApiError::PoolError(_)
            | ApiError::TaskError(_)
            | ApiError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name used in log records
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::NotFound(_) => "NotFound",
            ApiError::DatabaseError(_) => "DatabaseError",
            ApiError::PoolError(_) => "PoolError",
            ApiError::TaskError(_) => "TaskError",
            ApiError::IoError(_) => "IoError",
        }
    }

    /// The fixed message a caller is allowed to see
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => VALIDATION_MESSAGE,
            ApiError::NotFound(_) => NOT_FOUND_MESSAGE,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Shorthand for a missing restaurant
    pub fn restaurant_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("restaurant {}", id))
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Create an error response from an ApiError
    pub fn from_error(error: &ApiError) -> Self {
        Self::new(error.public_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::debug!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

/// Result type alias for operations that can fail with ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
