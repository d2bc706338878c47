//! HTTP error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maiden_kernel::DustError;
use serde::Serialize;
use thiserror::Error;

/// An error returned to the client as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Acting on a resource that has to exist first. A path running
    /// through a file is as missing as an absent one.
    pub fn lookup(err: DustError) -> Self {
        match err {
            DustError::NotADirectory(_) => ApiError::NotFound(err.to_string()),
            _ => err.into(),
        }
    }

    /// Reading a directory that was just found: any failure is reported as
    /// a bad request rather than a server fault.
    pub fn listing(err: DustError) -> Self {
        match err {
            DustError::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }

    /// Creating or saving: everything but a bad path is a server fault.
    pub fn saving(err: DustError) -> Self {
        match err {
            DustError::InvalidPath(_) | DustError::BadRequest(_) => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DustError> for ApiError {
    fn from(err: DustError) -> Self {
        let message = err.to_string();
        match err {
            DustError::NotFound(_) => ApiError::NotFound(message),
            DustError::NotADirectory(_) | DustError::BadRequest(_) | DustError::InvalidPath(_) => {
                ApiError::BadRequest(message)
            }
            DustError::Io { .. } => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
