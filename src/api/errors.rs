use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::models::ValidationFailure;
use crate::store::StoreError;

pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Error kinds surfaced to callers, each with a fixed status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unprocessable,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    /// Rejected payloads and failed writes (validation, uniqueness, references).
    #[error("{0}")]
    Unprocessable(String),
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Unprocessable(_) => ErrorKind::Unprocessable,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message placed under the `detail` key of the response body.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_ERROR_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(detail) => ApiError::NotFound(detail),
            StoreError::Integrity(detail) => ApiError::Unprocessable(detail),
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Unprocessable(failure.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("Not found.".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind().status();
        if let ApiError::Internal(cause) = &self {
            tracing::error!("Unhandled error: {}", cause);
        }

        let body = Json(json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}
