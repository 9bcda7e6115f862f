//! Train Search Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Downloads daily railway timetables from the open-data portal and keeps a
//! local copy per service day.
//!
//! - [`listing`]: parse the portal's listing page into download links
//! - [`crawler`]: download and store files, skipping unchanged content
//! - [`scheduler`]: re-crawl at fixed times every day
//! - [`loader`]: flatten timetables into rows (PostgreSQL with `database`)
//!
//! # Example
//!
//! ```no_run
//! use ts_ingest::{Crawler, CrawlerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let crawler = Crawler::new(CrawlerConfig::from_env())?;
//!     let report = crawler.run_for_all(false).await?;
//!     println!("saved {} timetables", report.saved.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod listing;
pub mod loader;
pub mod scheduler;

pub use config::CrawlerConfig;
pub use crawler::{CrawlReport, Crawler, DateOutcome, StoreOutcome};
pub use error::{IngestError, Result};
pub use scheduler::{CrawlSchedule, CrawlScheduler};
