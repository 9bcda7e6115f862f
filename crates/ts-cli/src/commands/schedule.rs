//! `ts schedule` command implementation
//!
//! Fetches a stored timetable and prints one row per train.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use ts_common::{ScheduleDate, Timetable, TrainInfo};

use crate::api::defaults;
use crate::error::Result;

pub async fn run(date: ScheduleDate, json: bool) -> Result<()> {
    let timetable = defaults::shared()?.get_schedule(date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timetable)?);
        return Ok(());
    }

    if timetable.train_infos.is_empty() {
        println!("No trains scheduled for {}.", date.iso());
        return Ok(());
    }

    println!("{}", format!("Timetable for {}", date.iso()).cyan().bold());
    println!("{}", table(&timetable));
    println!(
        "  {} trains, {} stops",
        timetable.train_infos.len(),
        timetable.stop_count()
    );

    Ok(())
}

fn table(timetable: &Timetable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Train", "Type", "From", "Departs", "To", "Arrives", "Stops"]);

    for train in &timetable.train_infos {
        table.add_row(row(train));
    }

    table
}

fn row(train: &TrainInfo) -> Vec<String> {
    let first = train.time_infos.first();
    let last = train.time_infos.last();

    vec![
        train.train_code.clone(),
        train.train_type.clone(),
        first.map(|t| t.station.clone()).unwrap_or_default(),
        first.map(|t| t.dep_time.clone()).unwrap_or_default(),
        last.map(|t| t.station.clone()).unwrap_or_default(),
        last.map(|t| t.arr_time.clone()).unwrap_or_default(),
        train.time_infos.len().to_string(),
    ]
}
