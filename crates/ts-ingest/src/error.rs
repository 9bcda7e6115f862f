//! Error types for timetable ingestion

use thiserror::Error;
use ts_common::TsError;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("No timetable links found on listing page {0}")]
    EmptyListing(String),

    #[error("Empty response body from {0}")]
    EmptyDownload(String),

    #[error("Listing parser error: {0}")]
    Parser(String),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid timetable row for train {train}: {reason}")]
    InvalidRow { train: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] TsError),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IngestError {
    pub fn invalid_row(train: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            train: train.into(),
            reason: reason.into(),
        }
    }
}
