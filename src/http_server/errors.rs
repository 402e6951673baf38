//! # API Errors
//!
//! Error types for the employee routes. Every error renders as
//! `{"message": "..."}` so clients read one body shape for success and
//! failure alike.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use super::employee_routes::MessageResponse;
use crate::store::StoreError;

/// Result type for employee handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Employee API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors
    // ==================
    /// No employee with this id
    #[error("Employee {0} not found")]
    NotFound(i64),

    /// Insert of an id that is already stored
    #[error("Employee with id {0} already exists")]
    DuplicateId(i64),

    // ==================
    // Write Failures
    // ==================
    /// Insert was not acknowledged by the store
    #[error("Employee could not be created")]
    InsertFailed,

    /// Update matched no record
    #[error("Employee update failed")]
    UpdateFailed,

    /// Delete matched no record
    #[error("Employee delete failed")]
    DeleteFailed,

    // ==================
    // Server Errors
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    ///
    /// Write failures keep the 200 status older clients check the message of.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateId(_) => StatusCode::CONFLICT,
            ApiError::InsertFailed | ApiError::UpdateFailed | ApiError::DeleteFailed => {
                StatusCode::OK
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => ApiError::DuplicateId(id),
            other => {
                error!(error = %other, "store operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "employee request failed");
        }
        let body = Json(MessageResponse::new(self.to_string()));
        (status, body).into_response()
    }
}
