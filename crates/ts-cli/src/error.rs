//! Error types for the Train Search client
//!
//! Messages are user-facing and say what to check next.

use thiserror::Error;
use ts_common::TsError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Server answered with an error body or unexpected status
    #[error("Server error: {0}. Ensure the Train Search server is running and accessible.")]
    Api(String),

    /// Server answered 404
    #[error("{0}")]
    NotFound(String),

    /// Requested timetable is not stored on the server
    #[error("{0}. Run 'ts force-download --date <YYYYMMDD>' to fetch it.")]
    TimetableNotFound(String),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your connection and server URL.")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP client base address is already configured as '{0}'")]
    AlreadyConfigured(String),

    #[error("HTTP client base address has not been configured")]
    NotConfigured,

    #[error("Invalid mount selector '{0}': expected '#<element-id>'")]
    InvalidSelector(String),

    #[error("Mount point '#{0}' not found in host document")]
    MountPointNotFound(String),

    #[error("A root component is already mounted at '#{0}'")]
    AlreadyMounted(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] TsError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
