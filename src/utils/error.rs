//! Error types and handling
//!
//! Every failure a handler can produce is an [`AppError`]. Each variant maps to
//! one HTTP status and one stable `error` identifier in the JSON body, so
//! callers can tell "no membership" apart from "member, but not an admin".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Semantically invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// No valid session (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not a member of the organization (403)
    #[error("{0}")]
    AccessDenied(String),

    /// Member of the organization, but lacking the required role (403)
    #[error("{0}")]
    PermissionDenied(String),

    /// Resource already exists or state conflict (409)
    #[error("{0}")]
    Conflict(String),

    /// Input failed validation (422)
    #[error("{message}")]
    ValidationError {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied(message.into())
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a repository failure.
    ///
    /// The full error chain is logged; the response only names `action`, except
    /// for conflicts, which keep their own message.
    pub fn store(action: &str, err: anyhow::Error) -> Self {
        error!("Failed to {}: {:#}", action, err);
        match AppError::from(err) {
            AppError::Database(_) => AppError::Database(format!("Failed to {}", action)),
            AppError::Internal(_) => AppError::Internal(format!("Failed to {}", action)),
            other => other,
        }
    }

    /// Stable identifier used in the `error` field of the response body
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::AccessDenied(_) => "access_denied",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::Conflict(_) => "conflict",
            AppError::ValidationError { .. } => "validation_error",
            AppError::Internal(_) => "internal_error",
            AppError::Database(_) => "database_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) | AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        match &self {
            AppError::Internal(_) | AppError::Database(_) => {
                error!(error = %self, error_type = error_type, "Request error");
            }
            AppError::AccessDenied(_) | AppError::PermissionDenied(_) => {
                warn!(error = %self, error_type = error_type, "Request denied");
            }
            _ => {}
        }

        let mut body = ErrorResponse::new(error_type, self.to_string());
        if let AppError::ValidationError {
            details: Some(details),
            ..
        } = self
        {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Repository errors carry the sqlx error at the root of the context chain.
        if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
            if let sqlx::Error::Database(db_err) = sqlx_err {
                if db_err.is_unique_violation() {
                    return AppError::conflict("Resource already exists");
                }
            }
            return AppError::Database(format!("{:#}", err));
        }
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = serde_json::Map::new();
        let mut first_message = None;

        let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
        field_errors.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, errs) in field_errors {
            let messages: Vec<serde_json::Value> = errs
                .iter()
                .map(|e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    if first_message.is_none() {
                        first_message = Some(msg.clone());
                    }
                    serde_json::Value::String(msg)
                })
                .collect();
            fields.insert(field.to_string(), serde_json::Value::Array(messages));
        }

        AppError::ValidationError {
            message: first_message.unwrap_or_else(|| "Validation failed".to_string()),
            details: Some(serde_json::Value::Object(fields)),
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
