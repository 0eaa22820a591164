//! Centralized error handling.
//!
//! A single error type for the whole application with automatic
//! HTTP response conversion. Internal detail is logged, never sent
//! to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External collaborators
    #[error("Database error")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error")]
    Bson(#[from] bson::ser::Error),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A dual-write was left half-applied. Requires manual
    /// reconciliation; never downgraded to a generic failure.
    #[error("Internal inconsistency: {0}")]
    Inconsistency(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Bson(_) => "SERIALIZATION_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::NotConfigured(_) => "NOT_CONFIGURED",
            AppError::Inconsistency(_) => "INTERNAL_INCONSISTENCY",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_)
            | AppError::Bson(_)
            | AppError::Inconsistency(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(entity) => format!("{} not found", entity),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Bson(e) => {
                tracing::error!("BSON serialization error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                "An upstream service failed".to_string()
            }
            // Logged distinctly so partial dual-writes can be reconciled
            AppError::Inconsistency(msg) => {
                tracing::error!(kind = "inconsistency", "Internal inconsistency: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

// Server code for "text index required for $text query"
const TEXT_INDEX_REQUIRED: i32 = 27;

/// Convenience constructors
impl AppError {
    /// True when Mongo rejected a `$text` query for lack of a text index
    pub fn is_missing_text_index(&self) -> bool {
        match self {
            AppError::Database(e) => matches!(
                *e.kind,
                mongodb::error::ErrorKind::Command(ref c) if c.code == TEXT_INDEX_REQUIRED
            ),
            _ => false,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn inconsistency(msg: impl Into<String>) -> Self {
        AppError::Inconsistency(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Course").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::conflict("Already enrolled in this course").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::upstream("timeout").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::NotConfigured("OpenAI API key").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::inconsistency("half-applied enroll").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn inconsistency_keeps_a_distinct_code() {
        // Must stay distinguishable from ordinary internal errors
        assert_eq!(
            AppError::inconsistency("x").code(),
            "INTERNAL_INCONSISTENCY"
        );
        assert_eq!(AppError::internal("x").code(), "INTERNAL_ERROR");
    }
}
