//! Error types for Bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::validation::ValidationReport;

/// Machine-readable error codes returned alongside fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    Duplicate = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Candidate record failed one or more rules; carries every violation
    #[error("Validation failed on: {}", .0.keys().collect::<Vec<_>>().join(", "))]
    Invalid(ValidationReport),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository-level uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for fatal errors
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

/// Error response body for rejected records
#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    /// Field (or `uniqueness`) to the ordered list of violation messages
    #[schema(
        value_type = Object,
        example = json!({"title": ["can't be blank", "is too short (minimum is 2 characters)"]})
    )]
    pub error: ValidationReport,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Invalid(report) => {
                let body = Json(ValidationErrorResponse { error: report });
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg),
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
