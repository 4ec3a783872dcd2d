//! Crate-wide error type and its HTTP representation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::slug_validator::SlugError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned by API handlers.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by link allocation, resolution and analytics.
///
/// Validation and uniqueness errors are user-facing and map directly to UI
/// messages. [`AppError::AggregationSourceUnavailable`] is internal to
/// [`crate::application::services::MetricsService`] and only ever triggers
/// the raw-event fallback.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Validation(#[from] SlugError),

    #[error("This code is already taken")]
    CodeTaken { code: String },

    #[error("Could not allocate a unique short code")]
    AllocationExhausted,

    #[error("{0}")]
    NotFound(String),

    #[error("You do not own this link")]
    Unauthorized,

    #[error("This link has expired")]
    Expired,

    #[error("This link is no longer active")]
    Inactive,

    #[error("Aggregation source unavailable: {0}")]
    AggregationSourceUnavailable(String),

    #[error("Metrics are temporarily unavailable")]
    MetricsUnavailable,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn code_taken(code: impl Into<String>) -> Self {
        Self::CodeTaken { code: code.into() }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "invalid_url"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::CodeTaken { .. } => (StatusCode::CONFLICT, "code_taken"),
            AppError::AllocationExhausted => {
                (StatusCode::SERVICE_UNAVAILABLE, "allocation_exhausted")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Unauthorized => (StatusCode::FORBIDDEN, "unauthorized"),
            AppError::Expired => (StatusCode::GONE, "expired"),
            AppError::Inactive => (StatusCode::GONE, "inactive"),
            AppError::AggregationSourceUnavailable(_) | AppError::MetricsUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "metrics_unavailable")
            }
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::Validation(reason) => json!({ "reason": reason.kind() }),
            AppError::CodeTaken { code } => json!({ "code": code }),
            _ => json!({}),
        }
    }

    /// Converts the error into the payload shape used in API responses.
    ///
    /// Internal details are replaced by a generic message so store faults are
    /// never leaked to clients.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let message = match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::AggregationSourceUnavailable(_) => {
                AppError::MetricsUnavailable.to_string()
            }
            other => other.to_string(),
        };

        ErrorInfo {
            code,
            message,
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if let AppError::Internal(ref message) = self {
            tracing::error!(%message, "request failed with internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        AppError::InvalidRequest(fields.join(", "))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e, None)
    }
}

/// Maps a database error into the crate error type.
///
/// A unique violation on the short code constraint is authoritative: it is
/// reported as [`AppError::CodeTaken`] exactly like a failed pre-check.
pub fn map_sqlx_error(e: sqlx::Error, code: Option<&str>) -> AppError {
    if crate::utils::db_error::is_unique_violation_on_code(&e) {
        return AppError::code_taken(code.unwrap_or_default());
    }

    tracing::error!(error = %e, "database error");
    AppError::internal("Database error")
}
