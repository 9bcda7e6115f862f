//! Error types shared across Train Search crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, TsError>;

/// Main error type for shared Train Search code
#[derive(Error, Debug)]
pub enum TsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid schedule date '{0}': expected YYYYMMDD")]
    InvalidDate(String),
}
