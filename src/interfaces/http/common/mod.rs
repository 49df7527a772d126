//! Shared HTTP plumbing: response envelope, error mapping, extractors

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Success: `{"success": true, "message": "...", "data": {...}}`,
/// failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result.
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError<T>>;

/// HTTP status for a domain failure.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotFound { .. } | DomainError::Query(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Write(_) | DomainError::Transaction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Map a domain failure to its response, logging server-side ones.
pub fn domain_error<T>(err: DomainError) -> ApiError<T> {
    let status = status_for(&err);
    if err.is_server_side() {
        error!(status = status.as_u16(), error = %err, "request failed");
    }
    (status, Json(ApiResponse::error(err.client_message())))
}

/// Struct-level check shared by every request carrying a stay.
pub fn validate_stay(start: NaiveDate, end: NaiveDate) -> Result<(), validator::ValidationError> {
    if end >= start {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("date_range");
    err.message = Some("endDate must not be before startDate".into());
    Err(err)
}
