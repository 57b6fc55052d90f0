//! Custom error types for the API service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Custom error type for the API service
///
/// Every variant renders as a bare status code with an empty body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or unknown session token
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Malformed request shape or field values
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The referenced resource does not exist or is not owned by the caller
    #[error("Not found")]
    NotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Database(e) => error!("Request failed: {}", e),
            ApiError::Validation(reason) => warn!("Rejected request: {}", reason),
            ApiError::Unauthenticated | ApiError::NotFound => {}
        }

        status.into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
