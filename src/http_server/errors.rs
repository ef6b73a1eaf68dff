//! HTTP error mapping
//!
//! Maps store and routing failures to status codes. Store errors are
//! terminal for the operation; this layer only decides the user-visible
//! status and body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::{Constraint, StoreError};

/// API-level errors surfaced to clients
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No route matched the request
    #[error("I apologize, I couldn't find what you were looking for.")]
    RouteNotFound,

    /// Request body was not valid JSON (or not an object)
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path parameter is not a valid UUID
    #[error("User ID:{0} is invalid.")]
    InvalidId(String),

    /// No row with the given id
    #[error("User with ID:{0} doesn't exist.")]
    UserNotFound(String),

    /// Store-level failure
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(err) => match err {
                StoreError::Schema(_) => StatusCode::BAD_REQUEST,
                StoreError::ColumnNotFound { .. } => StatusCode::BAD_REQUEST,
                StoreError::InvalidDataType { .. } => StatusCode::BAD_REQUEST,
                StoreError::ConstraintViolation { constraint, .. } => match constraint {
                    Constraint::Unique => StatusCode::CONFLICT,
                    Constraint::Required => StatusCode::BAD_REQUEST,
                },
                // Tables are registered at boot; a miss here is a
                // programmer error
                StoreError::TableNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
