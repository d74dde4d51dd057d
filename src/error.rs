//! Error types for the check-in server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned to clients alongside the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    BadValue = 2,
    NoSuchVisitor = 3,
    StoreUnavailable = 4,
    StoreRejected = 5,
    OutcomeUnknown = 6,
    ProcessingTimeout = 7,
    NotConfigured = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input. Never retried, never logged as a fault.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network, timeout or connection class failure
    #[error("Store unavailable: {0}")]
    TransientStore(String),

    /// Constraint violations and malformed queries
    #[error("Store rejected operation: {0}")]
    NonRetryableStore(String),

    /// A write whose outcome could not be confirmed
    #[error("Store outcome unknown: {0}")]
    Indeterminate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Processing timed out after {0} ms")]
    ProcessingTimeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether a bounded retry may be attempted for this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransientStore(_) | AppError::ProcessingTimeout(_))
    }

    /// Classify an error raised by a write whose effect may already be applied.
    ///
    /// Connection-level failures that happen after the statement was sent are
    /// reported as [`AppError::Indeterminate`] so they are never retried.
    pub fn from_write(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_) | sqlx::Error::Protocol(_) | sqlx::Error::WorkerCrashed => {
                AppError::Indeterminate(e.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => AppError::TransientStore(e.to_string()),
            sqlx::Error::Configuration(_) => AppError::Config(e.to_string()),
            sqlx::Error::Database(db) => match db.code() {
                // 08xxx connection exception, 40xxx transaction rollback,
                // 53xxx insufficient resources, 57xxx operator intervention
                Some(code)
                    if ["08", "40", "53", "57"]
                        .iter()
                        .any(|class| code.starts_with(class)) =>
                {
                    AppError::TransientStore(e.to_string())
                }
                _ => AppError::NonRetryableStore(e.to_string()),
            },
            _ => AppError::NonRetryableStore(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchVisitor, msg.clone())
            }
            AppError::TransientStore(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::StoreUnavailable,
                    "Store unavailable".to_string(),
                )
            }
            AppError::NonRetryableStore(msg) => {
                tracing::error!("Store rejected operation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreRejected,
                    "Store error".to_string(),
                )
            }
            AppError::Indeterminate(msg) => {
                tracing::error!("Store outcome unknown: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::OutcomeUnknown,
                    "Store outcome unknown".to_string(),
                )
            }
            AppError::ProcessingTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorCode::ProcessingTimeout,
                self.to_string(),
            ),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::NotConfigured,
                    "Store not configured".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
