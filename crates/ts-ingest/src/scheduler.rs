//! Crawl scheduler
//!
//! Re-runs the full crawl at fixed local times every day. The portal
//! refreshes its files twice a day, so the default fire times are 06:00 and
//! 18:00.

use chrono::{Days, Local, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::crawler::Crawler;

/// Daily fire times, kept sorted and de-duplicated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSchedule {
    times: Vec<NaiveTime>,
}

impl Default for CrawlSchedule {
    fn default() -> Self {
        Self::new([(6, 0), (18, 0)]
            .into_iter()
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)))
    }
}

impl CrawlSchedule {
    pub fn new(times: impl IntoIterator<Item = NaiveTime>) -> Self {
        let mut times: Vec<_> = times.into_iter().collect();
        times.sort();
        times.dedup();
        Self { times }
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Earliest fire time strictly after `now`, or `None` for an empty schedule
    pub fn next_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = now.date();

        if let Some(time) = self.times.iter().find(|t| **t > now.time()) {
            return Some(today.and_time(*time));
        }

        let tomorrow = today.checked_add_days(Days::new(1))?;
        self.times.first().map(|time| tomorrow.and_time(*time))
    }
}

/// Background task running the crawl on a [`CrawlSchedule`]
pub struct CrawlScheduler {
    crawler: Arc<Crawler>,
    schedule: CrawlSchedule,
}

impl CrawlScheduler {
    pub fn new(crawler: Arc<Crawler>, schedule: CrawlSchedule) -> Self {
        Self { crawler, schedule }
    }

    /// Spawn the scheduling loop. Abort the handle to stop it.
    pub fn start(self) -> JoinHandle<()> {
        info!(times = ?self.schedule.times(), "Starting crawl scheduler");

        tokio::spawn(async move {
            loop {
                let now = Local::now();
                let Some(next) = self.schedule.next_after(now.naive_local()) else {
                    info!("Crawl schedule is empty, scheduler stopping");
                    return;
                };

                let wait = until(now, next);
                info!(next_run = %next, "Next scheduled crawl");
                tokio::time::sleep(wait).await;

                match self.crawler.run_for_all(false).await {
                    Ok(report) => info!(
                        saved = report.saved.len(),
                        failed = report.failed.len(),
                        "Scheduled crawl completed"
                    ),
                    Err(e) => error!(error = %e, "Scheduled crawl failed"),
                }
            }
        })
    }
}

/// Wall-clock wait from `now` until local time `next`.
///
/// Times skipped by a DST change resolve to the earliest valid instant; a
/// minimum of one second avoids a busy loop around the boundary.
fn until(now: chrono::DateTime<Local>, next: NaiveDateTime) -> Duration {
    let target = Local
        .from_local_datetime(&next)
        .earliest()
        .unwrap_or_else(|| now + chrono::Duration::hours(1));

    (target - now)
        .to_std()
        .unwrap_or_default()
        .max(Duration::from_secs(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_default_schedule_times() {
        let schedule = CrawlSchedule::default();
        let times: Vec<String> = schedule.times().iter().map(|t| t.format("%H:%M").to_string()).collect();
        assert_eq!(times, vec!["06:00", "18:00"]);
    }

    #[test]
    fn test_next_after_same_day() {
        let schedule = CrawlSchedule::default();
        assert_eq!(schedule.next_after(at(18, 1, 30)), Some(at(18, 6, 0)));
        assert_eq!(schedule.next_after(at(18, 6, 0)), Some(at(18, 18, 0)));
        assert_eq!(schedule.next_after(at(18, 12, 0)), Some(at(18, 18, 0)));
    }

    #[test]
    fn test_next_after_rolls_over_midnight() {
        let schedule = CrawlSchedule::default();
        assert_eq!(schedule.next_after(at(18, 18, 0)), Some(at(19, 6, 0)));
        assert_eq!(schedule.next_after(at(31, 23, 59)).unwrap().to_string(), "2025-04-01 06:00:00");
    }

    #[test]
    fn test_schedule_sorts_and_dedups() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let schedule = CrawlSchedule::new([t(18), t(6), t(18)]);
        assert_eq!(schedule.times(), &[t(6), t(18)]);
    }

    #[test]
    fn test_empty_schedule_has_no_next() {
        assert_eq!(CrawlSchedule::new(Vec::<NaiveTime>::new()).next_after(at(18, 0, 0)), None);
    }
}
