//! API response types

use serde::{Deserialize, Serialize};

/// Error body returned by the server
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Result of `GET /force-download`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceDownloadResponse {
    pub message: String,
    /// Set for single-date downloads
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub saved: Vec<String>,
    #[serde(default)]
    pub unchanged: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub q: Option<String>,
}
