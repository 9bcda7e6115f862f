//! Flattening timetables into relational rows
//!
//! Each stop of each train becomes one `train_schedule` row. Departure and
//! arrival are stored as timestamps on the file's service day. With the
//! `database` feature, [`ScheduleLoader`] writes the rows to PostgreSQL.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use ts_common::{ScheduleDate, Timetable, TrainInfo};

use crate::crawler::Crawler;
use crate::error::{IngestError, Result};

/// One stop of one train on one service day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub train_type: String,
    pub train_code: String,
    pub breast_feed: String,
    pub route: String,
    pub package: String,
    pub overnight_stn: String,
    pub line_dir: String,
    pub line: String,
    pub dinning: String,
    pub food_srv: String,
    pub cripple: String,
    pub car_class: String,
    pub bike: String,
    pub extra_train: String,
    pub everyday: String,
    pub note: String,
    pub note_eng: String,
    pub station: String,
    pub order_in_trip: i32,
    pub dep_time: NaiveDateTime,
    pub arr_time: NaiveDateTime,
    pub route_station: String,
}

/// Expand a timetable into one row per stop
pub fn flatten(date: ScheduleDate, timetable: &Timetable) -> Result<Vec<ScheduleRow>> {
    let mut rows = Vec::with_capacity(timetable.stop_count());

    for train in &timetable.train_infos {
        for stop in &train.time_infos {
            let order_in_trip = stop.order.trim().parse::<i32>().map_err(|_| {
                IngestError::invalid_row(&train.train_code, format!("bad stop order '{}'", stop.order))
            })?;

            rows.push(ScheduleRow {
                station: stop.station.clone(),
                order_in_trip,
                dep_time: stop_time(date, train, &stop.dep_time)?,
                arr_time: stop_time(date, train, &stop.arr_time)?,
                route_station: stop.route.clone(),
                ..train_columns(train)
            });
        }
    }

    Ok(rows)
}

fn train_columns(train: &TrainInfo) -> ScheduleRow {
    ScheduleRow {
        train_type: train.train_type.clone(),
        train_code: train.train_code.clone(),
        breast_feed: train.breast_feed.clone(),
        route: train.route.clone(),
        package: train.package.clone(),
        overnight_stn: train.overnight_station.clone(),
        line_dir: train.line_dir.clone(),
        line: train.line.clone(),
        dinning: train.dinning.clone(),
        food_srv: train.food_service.clone(),
        cripple: train.cripple.clone(),
        car_class: train.car_class.clone(),
        bike: train.bike.clone(),
        extra_train: train.extra_train.clone(),
        everyday: train.everyday.clone(),
        note: train.note.clone(),
        note_eng: train.note_eng.clone(),
        station: String::new(),
        order_in_trip: 0,
        dep_time: NaiveDateTime::default(),
        arr_time: NaiveDateTime::default(),
        route_station: String::new(),
    }
}

fn stop_time(date: ScheduleDate, train: &TrainInfo, raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(|time| date.date().and_time(time))
        .map_err(|_| IngestError::invalid_row(&train.train_code, format!("bad stop time '{}'", raw)))
}

/// Timetable files in `folder`, sorted by date. Files whose stem is not a
/// `YYYYMMDD` date are ignored.
pub fn json_files(folder: &Path) -> Result<Vec<(ScheduleDate, PathBuf)>> {
    if !folder.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(date) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<ScheduleDate>().ok())
        else {
            continue;
        };
        files.push((date, path));
    }

    files.sort();
    Ok(files)
}

/// Run a full crawl if the storage folder holds no timetables yet.
///
/// Returns `true` when a crawl was performed.
pub async fn ensure_json_files(crawler: &Crawler) -> Result<bool> {
    let folder = &crawler.config().db_folder;
    tokio::fs::create_dir_all(folder).await?;

    if !json_files(folder)?.is_empty() {
        info!(folder = %folder.display(), "Timetables present, skipping download");
        return Ok(false);
    }

    info!(folder = %folder.display(), "No timetables found, downloading all listed files");
    crawler.run_for_all(false).await?;
    Ok(true)
}

/// Read and flatten one stored timetable file
pub async fn read_rows(date: ScheduleDate, path: &Path) -> Result<Vec<ScheduleRow>> {
    let content = tokio::fs::read(path).await?;
    let timetable = Timetable::from_slice(&content)?;
    flatten(date, &timetable)
}

#[cfg(feature = "database")]
pub use database::ScheduleLoader;

#[cfg(feature = "database")]
mod database {
    use sqlx::{PgPool, Postgres, QueryBuilder};
    use tracing::{info, instrument};
    use ts_common::ScheduleDate;

    use super::{ensure_json_files, json_files, read_rows, ScheduleRow};
    use crate::crawler::Crawler;
    use crate::error::Result;

    /// Rows per multi-row INSERT; 22 binds each stays under PostgreSQL's
    /// 65535 parameter limit.
    const INSERT_BATCH_SIZE: usize = 1000;

    const CREATE_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS train_schedule (
            id BIGSERIAL PRIMARY KEY,
            train_type TEXT NOT NULL,
            train_code TEXT NOT NULL,
            breast_feed TEXT NOT NULL,
            route TEXT NOT NULL,
            package TEXT NOT NULL,
            overnight_stn TEXT NOT NULL,
            line_dir TEXT NOT NULL,
            line TEXT NOT NULL,
            dinning TEXT NOT NULL,
            food_srv TEXT NOT NULL,
            cripple TEXT NOT NULL,
            car_class TEXT NOT NULL,
            bike TEXT NOT NULL,
            extra_train TEXT NOT NULL,
            everyday TEXT NOT NULL,
            note TEXT NOT NULL,
            note_eng TEXT NOT NULL,
            station TEXT NOT NULL,
            order_in_trip INTEGER NOT NULL,
            dep_time TIMESTAMP NOT NULL,
            arr_time TIMESTAMP NOT NULL,
            route_station TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    "#;

    /// Loads stored timetables into the `train_schedule` table
    pub struct ScheduleLoader {
        pool: PgPool,
    }

    impl ScheduleLoader {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        pub async fn ensure_schema(&self) -> Result<()> {
            sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
            Ok(())
        }

        /// Insert every row of one file in a single transaction
        #[instrument(skip(self, path), fields(date = %date))]
        pub async fn load_file(&self, date: ScheduleDate, path: &std::path::Path) -> Result<u64> {
            let rows = read_rows(date, path).await?;
            let mut tx = self.pool.begin().await?;
            let mut inserted = 0;

            for chunk in rows.chunks(INSERT_BATCH_SIZE) {
                inserted += insert_batch(chunk).build().execute(&mut *tx).await?.rows_affected();
            }

            tx.commit().await?;
            info!(rows = inserted, "Loaded timetable");
            Ok(inserted)
        }

        /// Make sure timetables exist locally, then load them all
        pub async fn process_all(&self, crawler: &Crawler) -> Result<u64> {
            ensure_json_files(crawler).await?;
            self.ensure_schema().await?;

            let mut total = 0;
            for (date, path) in json_files(&crawler.config().db_folder)? {
                info!(file = %path.display(), "Processing timetable file");
                total += self.load_file(date, &path).await?;
            }

            Ok(total)
        }
    }

    fn insert_batch(rows: &[ScheduleRow]) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new(
            "INSERT INTO train_schedule (train_type, train_code, breast_feed, route, package, \
             overnight_stn, line_dir, line, dinning, food_srv, cripple, car_class, bike, \
             extra_train, everyday, note, note_eng, station, order_in_trip, dep_time, arr_time, \
             route_station) ",
        );

        builder.push_values(rows, |mut b, row| {
            b.push_bind(&row.train_type)
                .push_bind(&row.train_code)
                .push_bind(&row.breast_feed)
                .push_bind(&row.route)
                .push_bind(&row.package)
                .push_bind(&row.overnight_stn)
                .push_bind(&row.line_dir)
                .push_bind(&row.line)
                .push_bind(&row.dinning)
                .push_bind(&row.food_srv)
                .push_bind(&row.cripple)
                .push_bind(&row.car_class)
                .push_bind(&row.bike)
                .push_bind(&row.extra_train)
                .push_bind(&row.everyday)
                .push_bind(&row.note)
                .push_bind(&row.note_eng)
                .push_bind(&row.station)
                .push_bind(row.order_in_trip)
                .push_bind(row.dep_time)
                .push_bind(row.arr_time)
                .push_bind(&row.route_station);
        });

        builder
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ts_common::TimeInfo;

    fn stop(station: &str, order: &str, arr: &str, dep: &str) -> TimeInfo {
        TimeInfo {
            station: station.to_string(),
            order: order.to_string(),
            arr_time: arr.to_string(),
            dep_time: dep.to_string(),
            route: String::new(),
        }
    }

    fn timetable() -> Timetable {
        Timetable {
            train_infos: vec![TrainInfo {
                train_code: "152".to_string(),
                car_class: "1100".to_string(),
                time_infos: vec![
                    stop("1000", "1", "06:00:00", "06:02:00"),
                    stop("1010", "2", "06:40", "06:41"),
                ],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_flatten_one_row_per_stop() {
        let date: ScheduleDate = "20250318".parse().unwrap();
        let rows = flatten(date, &timetable()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].train_code, "152");
        assert_eq!(rows[0].car_class, "1100");
        assert_eq!(rows[0].order_in_trip, 1);
        assert_eq!(rows[0].dep_time.to_string(), "2025-03-18 06:02:00");
        assert_eq!(rows[1].station, "1010");
        assert_eq!(rows[1].arr_time.to_string(), "2025-03-18 06:40:00");
    }

    #[test]
    fn test_flatten_rejects_bad_order() {
        let mut table = timetable();
        table.train_infos[0].time_infos[1].order = "second".to_string();

        let err = flatten("20250318".parse().unwrap(), &table).unwrap_err();
        assert!(err.to_string().contains("152"));
    }

    #[test]
    fn test_flatten_rejects_bad_time() {
        let mut table = timetable();
        table.train_infos[0].time_infos[0].dep_time = "25:99".to_string();

        assert!(flatten("20250318".parse().unwrap(), &table).is_err());
    }

    #[test]
    fn test_json_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["20250320.json", "20250318.json", "notes.json", "20250319.txt"] {
            std::fs::write(dir.path().join(name), b"{}").unwrap();
        }

        let files = json_files(dir.path()).unwrap();
        let dates: Vec<String> = files.iter().map(|(d, _)| d.to_string()).collect();

        assert_eq!(dates, vec!["20250318", "20250320"]);
    }

    #[test]
    fn test_json_files_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(json_files(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_rows_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20250318.json");
        std::fs::write(&path, serde_json::to_vec(&timetable()).unwrap()).unwrap();

        let rows = read_rows("20250318".parse().unwrap(), &path).await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
