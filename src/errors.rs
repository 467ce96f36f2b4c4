use std::error::Error;
use axum::http::StatusCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use crate::database::StoreError;

/// JSON body of every failed request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    timestamp: String,
    status: u16,
    error: String,
    message: String,
    path: Option<String>,
    error_code: ErrorCode,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // identity
    MissingIdentity,
    InsufficientPermissions,

    // listings and applications
    ContentNotFound,
    InvalidStatusTransition,

    // general
    ValidationError,
    ServiceUnavailable,
    UnexpectedError,
}

#[derive(Debug)]
pub struct HttpError {
    pub status_code: StatusCode,
    pub error_code: ErrorCode,
    pub message: String,
}

impl HttpError {

    pub fn new(status_code: StatusCode, error_code: ErrorCode, message: impl Into<String>) -> Self {
        HttpError { status_code, error_code, message: message.into() }
    }

    pub fn bad_request(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::MissingIdentity, message)
    }

    fn internal(error_code: ErrorCode, message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error_code, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code;
        if status.is_server_error() {
            tracing::error!(%status, code = ?self.error_code, "Request failed: {}", self.message);
        } else {
            tracing::debug!(%status, code = ?self.error_code, "Request rejected: {}", self.message);
        }

        let body = ErrorResponse {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            message: self.message,
            path: None,
            error_code: self.error_code,
        };
        (status, Json(body)).into_response()
    }
}

/// Failure of a write-path service call.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The caller is known but may not touch the record.
    #[error("Blocked: {0}")]
    Blocked(String),

    /// The record's current status does not allow the requested change.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("A store error occurred: {0}")]
    DatabaseError(#[source] Box<dyn Error + Send + Sync>),

    #[error("A processing error occurred: {0}")]
    ProcessingError(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> AppError {
        AppError::DatabaseError(Box::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> AppError {
        AppError::ProcessingError(err.to_string())
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> HttpError {
        match err {
            AppError::ValidationError(msg) => HttpError::bad_request(ErrorCode::ValidationError, msg),
            AppError::Conflict(msg) => HttpError::bad_request(ErrorCode::InvalidStatusTransition, msg),
            AppError::NotFound(msg) => HttpError::new(StatusCode::NOT_FOUND, ErrorCode::ContentNotFound, msg),
            AppError::Blocked(msg) => HttpError::new(StatusCode::FORBIDDEN, ErrorCode::InsufficientPermissions, msg),
            AppError::DatabaseError(source) => {
                tracing::error!("Store error: {source}");
                HttpError::internal(ErrorCode::ServiceUnavailable, "Internal service outage.")
            }
            AppError::ProcessingError(msg) => {
                tracing::error!("Processing error: {msg}");
                HttpError::internal(ErrorCode::UnexpectedError, "Unexpected server error processing.")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}
