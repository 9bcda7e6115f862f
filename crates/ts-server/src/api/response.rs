//! API response types
//!
//! Errors are returned as `{"error": "<message>"}` with a matching status
//! code; messages follow the wording the front-end already displays.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use ts_ingest::IngestError;

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Message body for command-style endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    #[serde(flatten)]
    pub details: T,
}

/// Application error type that can be converted to HTTP responses
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The upstream portal failed or returned unusable data
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Http(_)
            | IngestError::UpstreamStatus { .. }
            | IngestError::EmptyListing(_)
            | IngestError::EmptyDownload(_)
            | IngestError::Parser(_) => AppError::Upstream(err.to_string()),
            other => {
                tracing::error!(error = %other, "Ingest operation failed");
                AppError::Internal(format!("An unexpected error occurred: {}", other))
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
