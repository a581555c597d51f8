//! Centralized error types for Yatube.
//!
//! Every variant is recoverable at the request boundary: the HTTP layer turns
//! it into a response, never into a crashed task.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Core application error type used across all Yatube crates.
#[derive(Debug, thiserror::Error)]
pub enum YatubeError {
    // === Auth errors ===
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    // === Validation errors ===
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    // === Ownership ===
    #[error("Only the author may change this post")]
    PermissionDenied,

    // === Infrastructure errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl YatubeError {
    /// Shorthand for a `NotFound` naming the missing resource.
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for YatubeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't leak internal details to clients
        let (message, field) = match &self {
            YatubeError::Database(e) => {
                tracing::error!("Database error: {e}");
                ("An internal error occurred".to_string(), None)
            }
            YatubeError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                ("An internal error occurred".to_string(), None)
            }
            YatubeError::Validation { field, message } => (message.clone(), Some(field.clone())),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            code: status.as_u16(),
            error: self.error_code().to_string(),
            message,
            field,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results using YatubeError.
pub type YatubeResult<T> = Result<T, YatubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            YatubeError::not_found("Post").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            YatubeError::validation("text", "required").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            YatubeError::PermissionDenied.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            YatubeError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = YatubeError::validation("text", "This field is required.");
        assert_eq!(err.to_string(), "text: This field is required.");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
