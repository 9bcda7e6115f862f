//! Train Search Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Train Search workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`TsError`] and the [`Result`] alias
//! - **Checksums**: MD5 digests used to detect unchanged timetable downloads
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Types**: timetable documents and the `YYYYMMDD` schedule date
//!
//! # Example
//!
//! ```no_run
//! use ts_common::{checksum, Result, ScheduleDate};
//!
//! fn digest_for(date: &str) -> Result<String> {
//!     let date: ScheduleDate = date.parse()?;
//!     let content = std::fs::read(format!("db/{}", date.file_name()))?;
//!     Ok(checksum::digest(&content))
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TsError};
pub use types::{ScheduleDate, TimeInfo, Timetable, TrainInfo};
