//! HTTP API client for the Train Search server
//!
//! Requests take paths relative to the client's base address. A path that
//! is already an absolute `http(s)://` URL bypasses the base address.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use ts_common::{ScheduleDate, Timetable};
use url::Url;

use crate::api::{endpoints, types::*};
use crate::error::{CliError, Result};

// ============================================================================
// API Client Constants
// ============================================================================

/// Default base address of the Train Search server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8899";

/// Default timeout for API requests in seconds.
/// Can be overridden via the TS_API_TIMEOUT_SECS environment variable.
/// Forced full re-downloads can take a while, hence the generous default.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// API client for the Train Search server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`, which must be an absolute http(s) URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let timeout_secs = std::env::var("TS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a request path against the base address
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.resolve(endpoints::health_path())).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Fetch the stored timetable for a date
    pub async fn get_schedule(&self, date: ScheduleDate) -> Result<Timetable> {
        let response = self
            .get(&endpoints::schedule_path(date))
            .await
            .map_err(|e| match e {
                CliError::NotFound(message) => CliError::TimetableNotFound(message),
                other => other,
            })?;
        let bytes = response.bytes().await?;
        Ok(Timetable::from_slice(&bytes)?)
    }

    /// Ask the server to re-download one date, or everything
    pub async fn force_download(&self, date: Option<ScheduleDate>) -> Result<ForceDownloadResponse> {
        let response = self.get(&endpoints::force_download_path(date)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_item(&self, item_id: i64, q: Option<&str>) -> Result<Item> {
        let mut request = self.client.get(self.resolve(&endpoints::item_path(item_id)));
        if let Some(q) = q {
            request = request.query(&[("q", q)]);
        }
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.resolve(path);
        tracing::debug!(url = %url, "GET");
        check_status(self.client.get(&url).send().await?).await
    }
}

/// Turn non-success responses into errors, using the server's `{"error"}` body when present
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("HTTP {}", status));

    if status == StatusCode::NOT_FOUND {
        Err(CliError::NotFound(message))
    } else {
        Err(CliError::api(message))
    }
}

/// Validate a base address and strip any trailing `/`.
///
/// The address must be an absolute `http` or `https` URL with a host and
/// no query or fragment.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| CliError::invalid_base_url(raw, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CliError::invalid_base_url(raw, "scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(CliError::invalid_base_url(raw, "missing host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(CliError::invalid_base_url(raw, "must not contain a query or fragment"));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
