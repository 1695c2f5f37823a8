//! HTTP error handling and response types.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::paths::{FieldError, PathError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors: Vec::new(),
            details: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Caller input failed validation
    Unprocessable(Vec<FieldError>),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Unprocessable(errors) => unprocessable(errors),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
            AppError::Repository(e) => match &e {
                RepositoryError::NotFound { message, .. } => (
                    StatusCode::NOT_FOUND,
                    ApiError::new("NOT_FOUND", message.clone()),
                ),
                RepositoryError::ValidationError { message, context } => {
                    let field = context.entity.clone().unwrap_or_else(|| "query".to_string());
                    unprocessable(vec![FieldError::new(field, message.clone())])
                }
                _ => {
                    tracing::error!("repository error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("REPOSITORY_ERROR", e.message())
                            .with_details(e.context().to_string()),
                    )
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

fn unprocessable(errors: Vec<FieldError>) -> (StatusCode, ApiError) {
    let message = errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "Validation failed".to_string());
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::new("VALIDATION_ERROR", message).with_errors(errors),
    )
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<PathError> for AppError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::Validation(errors) => AppError::Unprocessable(errors),
            PathError::Registry(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Unprocessable(vec![FieldError::new("query", rejection.body_text())])
    }
}
