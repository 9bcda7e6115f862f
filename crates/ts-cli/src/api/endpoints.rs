//! API endpoint paths, relative to the client's base address

use ts_common::ScheduleDate;

/// Stored timetable for a date
pub fn schedule_path(date: ScheduleDate) -> String {
    format!("/json/{}", date)
}

/// Forced re-download of one date, or of everything when `date` is `None`
pub fn force_download_path(date: Option<ScheduleDate>) -> String {
    match date {
        Some(date) => format!("/force-download?file_date={}", date),
        None => "/force-download".to_string(),
    }
}

pub fn item_path(item_id: i64) -> String {
    format!("/items/{}", item_id)
}

pub fn health_path() -> &'static str {
    "/health"
}
