//! Train Search Ingest - timetable crawler

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use ts_common::logging::{init_logging, LogConfig, LogLevel};
use ts_common::ScheduleDate;
use ts_ingest::{CrawlSchedule, CrawlScheduler, Crawler, CrawlerConfig};

#[derive(Parser, Debug)]
#[command(name = "ts-ingest")]
#[command(author, version, about = "Railway timetable crawler")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory to save JSON files
    #[arg(long, env = "TS_DB_FOLDER", default_value = "db", global = true)]
    db_folder: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download all files listed on the portal
    All {
        /// Rewrite files even when the content is identical
        #[arg(short, long)]
        force: bool,
    },

    /// Download the file for one date
    Date {
        /// Service day (YYYYMMDD)
        date: ScheduleDate,

        /// Rewrite the file even when the content is identical
        #[arg(short, long)]
        force: bool,
    },

    /// Keep running and crawl at 06:00 and 18:00 every day
    Schedule,

    /// Load stored timetables into PostgreSQL, downloading them first if none exist
    #[cfg(feature = "database")]
    Load {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Info })
        .log_file_prefix("ts-ingest")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    let config = CrawlerConfig::from_env().with_db_folder(&cli.db_folder);
    tokio::fs::create_dir_all(&config.db_folder).await?;
    let crawler = Crawler::new(config)?;

    match cli.command {
        Command::All { force } => {
            let report = crawler.run_for_all(force).await?;
            let saved: Vec<String> = report.saved.iter().map(ToString::to_string).collect();
            info!(saved = ?saved, failed = report.failed.len(), "Downloaded files");
        },
        Command::Date { date, force } => {
            let outcome = crawler.run_for_date(date, force).await?;
            info!(date = %date, outcome = ?outcome, "Single-date crawl finished");
        },
        Command::Schedule => {
            let handle = CrawlScheduler::new(Arc::new(crawler), CrawlSchedule::default()).start();
            tokio::signal::ctrl_c().await?;
            info!("Received Ctrl+C, stopping scheduler");
            handle.abort();
        },
        #[cfg(feature = "database")]
        Command::Load { database_url } => {
            let pool = sqlx::PgPool::connect(&database_url).await?;
            let loader = ts_ingest::loader::ScheduleLoader::new(pool);
            let rows = loader.process_all(&crawler).await?;
            info!(rows, "Loaded all timetables");
        },
    }

    Ok(())
}
