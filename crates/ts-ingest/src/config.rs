//! Crawler configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Crawler Configuration Constants
// ============================================================================

/// Listing page enumerating the published daily timetables.
pub const DEFAULT_LISTING_URL: &str =
    "https://ods.railway.gov.tw/tra-ods-web/ods/download/dataResource/railway_schedule/JSON/list";

/// Origin prepended to the relative download links on the listing page.
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://ods.railway.gov.tw";

/// Per-request timeout for listing and download requests.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Folder holding one `<YYYYMMDD>.json` file per service day.
pub const DEFAULT_DB_FOLDER: &str = "db";

pub const USER_AGENT: &str = concat!("train-search-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    pub listing_url: String,
    pub source_base_url: String,
    pub timeout_secs: u64,
    pub db_folder: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            source_base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            db_folder: PathBuf::from(DEFAULT_DB_FOLDER),
        }
    }
}

impl CrawlerConfig {
    /// Load from `TS_LISTING_URL`, `TS_SOURCE_BASE_URL`, `TS_HTTP_TIMEOUT_SECS`
    /// and `TS_DB_FOLDER`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TS_LISTING_URL") {
            config.listing_url = url;
        }

        if let Ok(url) = std::env::var("TS_SOURCE_BASE_URL") {
            config.source_base_url = url;
        }

        if let Some(secs) = std::env::var("TS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = secs;
        }

        if let Ok(folder) = std::env::var("TS_DB_FOLDER") {
            config.db_folder = PathBuf::from(folder);
        }

        config
    }

    pub fn with_db_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.db_folder = folder.into();
        self
    }
}
