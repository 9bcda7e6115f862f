//! Train Search client library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Front-end bootstrap and command-line client for the Train Search server.
//!
//! # Overview
//!
//! - **Bootstrap**: point the shared HTTP client at the server, then mount
//!   the root component at `#app` (`ts app`)
//! - **Timetables**: show a stored day's timetable (`ts schedule`)
//! - **Downloads**: trigger a forced upstream re-download (`ts force-download`)
//! - **Health**: check the server is up (`ts health`)

pub mod api;
pub mod app;
pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ts_common::ScheduleDate;

/// Train Search - timetable client
#[derive(Parser, Debug)]
#[command(name = "ts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL
    #[arg(long, env = "TS_SERVER_URL", default_value = api::DEFAULT_BASE_URL, global = true)]
    pub server_url: String,

    /// Print the CLI reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the front-end and print the mounted page
    App {
        /// Write the page to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the stored timetable for a date
    Schedule {
        /// Date as YYYYMMDD
        date: ScheduleDate,

        /// Print the raw timetable JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-download timetables from upstream, ignoring stored checksums
    ForceDownload {
        /// Only this date (YYYYMMDD); all listed dates when omitted
        #[arg(short, long)]
        date: Option<ScheduleDate>,
    },

    /// Fetch an item
    Item {
        item_id: i64,

        /// Optional query string echoed back by the server
        #[arg(short)]
        q: Option<String>,
    },

    /// Check server health
    Health,
}
