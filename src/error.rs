//! Domain error types for the PRD generation server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::services::extraction::ExtractError;
use crate::services::llm::GenerationError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing request data (file, fields, payload)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced PRD or epic does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A prior pipeline step has not completed yet
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// The record changed while the operation was in flight
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The language model call failed or returned unparseable content
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The language model returned JSON that does not match the expected schema
    #[error("Generated content failed schema validation")]
    SchemaValidation(Vec<String>),

    /// Required external configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No generation slot became free in time
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected internal failure (I/O, lock poisoning)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PreconditionFailed(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Generation(_) | AppError::SchemaValidation(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut details = None;
        let (error_code, response_message) = match self {
            AppError::InvalidInput(_) => ("INVALID_INPUT", self.to_string()),
            AppError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            AppError::PreconditionFailed(_) => ("PRECONDITION_FAILED", self.to_string()),
            AppError::Conflict(_) => ("CONFLICT", self.to_string()),
            AppError::Generation(msg) => {
                tracing::warn!("Upstream generation error: {}", msg);
                ("UPSTREAM_GENERATION_ERROR", self.to_string())
            }
            AppError::SchemaValidation(violations) => {
                tracing::warn!(
                    "Generated content rejected by schema validation: {:?}",
                    violations
                );
                details = Some(violations.clone());
                ("SCHEMA_VALIDATION_FAILED", self.to_string())
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                ("CONFIGURATION_ERROR", self.to_string())
            }
            AppError::ServiceUnavailable(_) => ("SERVICE_UNAVAILABLE", self.to_string()),
            AppError::Internal(err_str) => {
                tracing::error!("Internal error: {}", err_str);
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
            details,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Individual schema violations, when the error is a validation failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Io(e) => AppError::Internal(format!("Failed to read upload: {}", e)),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Schema(violations) => AppError::SchemaValidation(violations),
            GenerationError::Template(msg) => AppError::Internal(msg),
            other => AppError::Generation(other.to_string()),
        }
    }
}
