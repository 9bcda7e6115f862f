//! `ts force-download` command implementation
//!
//! Asks the server to re-fetch one date, or every listed date, from the
//! upstream source regardless of stored checksums.

use colored::Colorize;
use ts_common::ScheduleDate;

use crate::api::{defaults, ForceDownloadResponse};
use crate::error::Result;

pub async fn run(date: Option<ScheduleDate>) -> Result<()> {
    let client = defaults::shared()?;

    match date {
        Some(date) => println!("Re-downloading timetable for {}...", date.iso().cyan()),
        None => println!("Re-downloading all listed timetables..."),
    }

    let response = client.force_download(date).await?;
    print_summary(&response);

    Ok(())
}

fn print_summary(response: &ForceDownloadResponse) {
    println!("{} {}", "✓".green(), response.message);

    if let Some(ref outcome) = response.outcome {
        println!("  Outcome: {}", outcome);
        return;
    }

    println!("  Saved:     {}", response.saved.len());
    println!("  Unchanged: {}", response.unchanged.len());
    if response.failed.is_empty() {
        println!("  Failed:    0");
    } else {
        println!("  Failed:    {} ({})", response.failed.len().to_string().red(), response.failed.join(", "));
    }
}
