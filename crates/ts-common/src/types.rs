//! Timetable domain types
//!
//! The upstream portal publishes one JSON document per service day. Field
//! names follow the portal's PascalCase keys; every value is a string.

use crate::error::{Result, TsError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A service day written as `YYYYMMDD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleDate(NaiveDate);

impl ScheduleDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Storage file name, e.g. `20250318.json`
    pub fn file_name(&self) -> String {
        format!("{}.json", self)
    }

    /// ISO 8601 form, e.g. `2025-03-18`
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl FromStr for ScheduleDate {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TsError::InvalidDate(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self)
            .map_err(|_| TsError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl Serialize for ScheduleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One day's timetable document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    #[serde(rename = "TrainInfos", default)]
    pub train_infos: Vec<TrainInfo>,
}

impl Timetable {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Total number of stops across all trains
    pub fn stop_count(&self) -> usize {
        self.train_infos.iter().map(|t| t.time_infos.len()).sum()
    }
}

/// A single train service and its attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TrainInfo {
    #[serde(rename = "Type")]
    pub train_type: String,
    #[serde(rename = "Train")]
    pub train_code: String,
    pub breast_feed: String,
    pub route: String,
    pub package: String,
    #[serde(rename = "OverNightStn")]
    pub overnight_station: String,
    pub line_dir: String,
    pub line: String,
    pub dinning: String,
    #[serde(rename = "FoodSrv")]
    pub food_service: String,
    pub cripple: String,
    pub car_class: String,
    pub bike: String,
    pub extra_train: String,
    pub everyday: String,
    pub note: String,
    pub note_eng: String,
    pub time_infos: Vec<TimeInfo>,
}

/// A stop within a train's trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimeInfo {
    pub station: String,
    pub order: String,
    #[serde(rename = "DEPTime")]
    pub dep_time: String,
    #[serde(rename = "ARRTime")]
    pub arr_time: String,
    pub route: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_date_parse() {
        let date: ScheduleDate = "20250318".parse().unwrap();
        assert_eq!(date.to_string(), "20250318");
        assert_eq!(date.iso(), "2025-03-18");
        assert_eq!(date.file_name(), "20250318.json");
    }

    #[test]
    fn test_schedule_date_rejects_malformed() {
        for raw in ["2025031", "2025-03-18", "20251340", "../etc/x", "2025031a", ""] {
            assert!(raw.parse::<ScheduleDate>().is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn test_timetable_deserialize() {
        let json = r#"{
            "TrainInfos": [{
                "Type": "0", "Train": "123", "BreastFeed": "N", "Route": "",
                "Package": "N", "OverNightStn": "0", "LineDir": "0", "Line": "1",
                "Dinning": "N", "FoodSrv": "0", "Cripple": "Y", "CarClass": "1100",
                "Bike": "N", "ExtraTrain": "N", "Everyday": "Y",
                "Note": "", "NoteEng": "", "Unexpected": "ignored",
                "TimeInfos": [
                    {"Station": "1000", "Order": "1", "DEPTime": "06:00:00", "ARRTime": "06:00:00", "Route": ""},
                    {"Station": "1010", "Order": "2", "DEPTime": "06:30:00", "ARRTime": "06:28:00", "Route": ""}
                ]
            }]
        }"#;

        let timetable = Timetable::from_slice(json.as_bytes()).unwrap();
        assert_eq!(timetable.train_infos.len(), 1);
        let train = &timetable.train_infos[0];
        assert_eq!(train.train_code, "123");
        assert_eq!(train.car_class, "1100");
        assert_eq!(train.overnight_station, "0");
        assert_eq!(train.time_infos[1].dep_time, "06:30:00");
        assert_eq!(timetable.stop_count(), 2);
    }

    #[test]
    fn test_timetable_missing_fields_default() {
        let timetable = Timetable::from_slice(br#"{"TrainInfos": [{"Train": "9"}]}"#).unwrap();
        assert_eq!(timetable.train_infos[0].train_code, "9");
        assert!(timetable.train_infos[0].time_infos.is_empty());
    }
}
