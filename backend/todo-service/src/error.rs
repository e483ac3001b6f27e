/// Error types for Todo Service
///
/// Every failure reaching a handler is rendered as `{"error": "<message>"}` with the
/// matching status code.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::services::IdServiceError;

/// Result type for todo-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for any missing todo
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Malformed or invalid request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The identifier service could not provide an id
    #[error("Identifier service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Storage backend failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn todo_not_found() -> Self {
        AppError::NotFound(TODO_NOT_FOUND.to_string())
    }

    /// Message exposed to clients. Server-side details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(_) => self.to_string(),
            AppError::UpstreamUnavailable(_) => "Identifier service unavailable".to_string(),
            AppError::Storage(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.public_message(),
        }))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::todo_not_found(),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<IdServiceError> for AppError {
    fn from(err: IdServiceError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
