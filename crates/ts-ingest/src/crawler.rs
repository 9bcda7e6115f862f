//! Timetable crawler
//!
//! Downloads every timetable advertised on the listing page into
//! `<db_folder>/<YYYYMMDD>.json`. A download whose MD5 digest matches the
//! stored copy is not rewritten unless the crawl is forced.
//!
//! Files are replaced atomically: readers see either the old or the new
//! content, never a partial write.

use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use ts_common::{checksum, ScheduleDate};

use crate::config::{CrawlerConfig, USER_AGENT};
use crate::error::{IngestError, Result};
use crate::listing::{parse_listing, ListedFile};

/// Result of writing one downloaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOutcome {
    Saved,
    Unchanged,
}

/// Result of a single-date crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOutcome {
    Saved,
    Unchanged,
    NotListed,
    DownloadFailed,
}

impl From<StoreOutcome> for DateOutcome {
    fn from(outcome: StoreOutcome) -> Self {
        match outcome {
            StoreOutcome::Saved => DateOutcome::Saved,
            StoreOutcome::Unchanged => DateOutcome::Unchanged,
        }
    }
}

/// Summary of a full crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub saved: Vec<ScheduleDate>,
    pub unchanged: Vec<ScheduleDate>,
    pub failed: Vec<ScheduleDate>,
}

pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Where the timetable for `date` is stored
    pub fn storage_path(&self, date: ScheduleDate) -> PathBuf {
        self.config.db_folder.join(date.file_name())
    }

    /// Fetch and parse the listing page
    pub async fn fetch_file_list(&self) -> Result<Vec<ListedFile>> {
        let url = &self.config.listing_url;
        debug!(url = %url, "Fetching listing page");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::UpstreamStatus {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        let files = parse_listing(&html, &self.config.source_base_url)?;

        if files.is_empty() {
            return Err(IngestError::EmptyListing(url.clone()));
        }

        info!(count = files.len(), "Listing page advertises {} timetables", files.len());
        Ok(files)
    }

    /// Download a file body
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(IngestError::UpstreamStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(IngestError::EmptyDownload(url.to_string()));
        }

        Ok(body.to_vec())
    }

    /// Write `content` as the timetable for `date`
    pub async fn store(
        &self,
        date: ScheduleDate,
        content: &[u8],
        force: bool,
    ) -> Result<StoreOutcome> {
        let path = self.storage_path(date);

        if !force {
            if let Ok(existing) = tokio::fs::read(&path).await {
                if checksum::same_content(&existing, content) {
                    debug!(date = %date, "Stored timetable is identical, skipping write");
                    return Ok(StoreOutcome::Unchanged);
                }
            }
        }

        tokio::fs::create_dir_all(&self.config.db_folder).await?;
        replace_file(&path, content).await?;

        info!(date = %date, bytes = content.len(), path = %path.display(), "Saved timetable");
        Ok(StoreOutcome::Saved)
    }

    async fn fetch_and_store(&self, file: &ListedFile, force: bool) -> Result<StoreOutcome> {
        let content = self.download(&file.url).await?;
        self.store(file.date, &content, force).await
    }

    /// Download every listed timetable.
    ///
    /// A failure to fetch the listing aborts the crawl; a failed download of
    /// one file is recorded in the report and the crawl moves on.
    #[instrument(skip(self), fields(folder = %self.config.db_folder.display()))]
    pub async fn run_for_all(&self, force: bool) -> Result<CrawlReport> {
        let files = self.fetch_file_list().await?;
        let mut report = CrawlReport::default();

        for file in &files {
            match self.fetch_and_store(file, force).await {
                Ok(StoreOutcome::Saved) => report.saved.push(file.date),
                Ok(StoreOutcome::Unchanged) => report.unchanged.push(file.date),
                Err(e) => {
                    warn!(date = %file.date, url = %file.url, error = %e, "Failed to download timetable, skipping");
                    report.failed.push(file.date);
                },
            }
        }

        info!(
            saved = report.saved.len(),
            unchanged = report.unchanged.len(),
            failed = report.failed.len(),
            "Crawl finished"
        );

        Ok(report)
    }

    /// Download the timetable for a single date
    #[instrument(skip(self), fields(date = %date))]
    pub async fn run_for_date(&self, date: ScheduleDate, force: bool) -> Result<DateOutcome> {
        let files = self.fetch_file_list().await?;

        let Some(file) = files.iter().find(|f| f.date == date) else {
            warn!("Date is not on the listing page");
            return Ok(DateOutcome::NotListed);
        };

        match self.fetch_and_store(file, force).await {
            Ok(outcome) => Ok(outcome.into()),
            Err(e) => {
                warn!(url = %file.url, error = %e, "Failed to download timetable");
                Ok(DateOutcome::DownloadFailed)
            },
        }
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`
async fn replace_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Unique per write so concurrent stores of one date don't share a temp file
    let temp = path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        NEXT_TEMP.fetch_add(1, Ordering::Relaxed)
    ));

    tokio::fs::write(&temp, content).await?;
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e);
    }

    Ok(())
}
