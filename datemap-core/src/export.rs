//! Month export as JSON or CSV.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::date_key::DateKey;
use crate::error::{DateMapError, DateMapResult};
use crate::event::DatedEvent;

const CSV_HEADER: [&str; 5] = ["Date", "Name", "Start Time", "End Time", "Description"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub date: DateKey,
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub description: String,
}

impl From<&DatedEvent> for ExportRecord {
    fn from(record: &DatedEvent) -> Self {
        ExportRecord {
            date: record.date,
            name: record.event.name.clone(),
            start_time: record.event.start_time,
            end_time: record.event.end_time,
            description: record.event.description.clone().unwrap_or_default(),
        }
    }
}

/// Parsed case-insensitively, both from strings and when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }

    /// `MM-YYYY-events.<ext>`
    pub fn file_name(&self, year: i32, month: u32) -> String {
        format!("{:02}-{}-events.{}", month, year, self.extension())
    }

    pub fn render(&self, records: &[ExportRecord]) -> DateMapResult<String> {
        match self {
            ExportFormat::Json => to_json(records),
            ExportFormat::Csv => Ok(to_csv(records)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unknown export format '{other}'. Expected json or csv")),
        }
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The records whose day falls in `month` of `year`, in their given order.
pub fn month_records(records: &[DatedEvent], year: i32, month: u32) -> Vec<ExportRecord> {
    records
        .iter()
        .filter(|r| r.date.year() == year && r.date.month() == month)
        .map(ExportRecord::from)
        .collect()
}

/// Pretty-printed JSON array.
pub fn to_json(records: &[ExportRecord]) -> DateMapResult<String> {
    serde_json::to_string_pretty(records).map_err(|e| DateMapError::Serialization(e.to_string()))
}

/// Header row plus one row per record, joined by `\n`.
pub fn to_csv(records: &[ExportRecord]) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];

    for record in records {
        let start = record.start_time.format(TIMESTAMP_FORMAT).to_string();
        let end = record.end_time.format(TIMESTAMP_FORMAT).to_string();
        let date = record.date.to_string();

        let row = [
            csv_field(&date),
            csv_field(&record.name),
            csv_field(&start),
            csv_field(&end),
            csv_field(&record.description),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Write `contents` to `dir/file_name`, creating `dir` if needed.
pub fn save_to(dir: &Path, file_name: &str, contents: &[u8]) -> DateMapResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use chrono::NaiveDate;

    fn record(date: &str, name: &str, description: Option<&str>) -> DatedEvent {
        let day: NaiveDate = date.parse().unwrap();
        DatedEvent {
            date: date.parse().unwrap(),
            event: Event {
                id: name.to_lowercase(),
                name: name.to_string(),
                start_time: day.and_hms_opt(9, 0, 0).unwrap(),
                end_time: day.and_hms_opt(10, 30, 0).unwrap(),
                description: description.map(String::from),
            },
        }
    }

    fn december() -> Vec<ExportRecord> {
        let all = vec![
            record("2024-11-30", "Before", None),
            record("2024-12-10", "Dentist", None),
            record("2024-12-24", "Dinner", Some("bring wine, cheese")),
            record("2025-12-01", "Next year", None),
        ];
        month_records(&all, 2024, 12)
    }

    #[test]
    fn filters_to_month_and_year() {
        let names: Vec<_> = december().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Dentist", "Dinner"]);
    }

    #[test]
    fn empty_month_exports_empty_array_and_header() {
        let none = month_records(&[], 2024, 2);
        assert_eq!(to_json(&none).unwrap(), "[]");
        assert_eq!(to_csv(&none), "Date,Name,Start Time,End Time,Description");
    }

    #[test]
    fn json_has_the_export_fields() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&december()).unwrap()).unwrap();
        assert_eq!(json[0]["date"], "2024-12-10");
        assert_eq!(json[0]["name"], "Dentist");
        assert_eq!(json[0]["startTime"], "2024-12-10T09:00:00");
        assert_eq!(json[0]["endTime"], "2024-12-10T10:30:00");
        assert_eq!(json[0]["description"], "");
    }

    #[test]
    fn csv_rows_follow_the_header() {
        let csv = to_csv(&december());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2024-12-10,Dentist,2024-12-10T09:00:00,2024-12-10T10:30:00,"
        );
    }

    #[test]
    fn csv_quotes_fields_with_delimiters() {
        let csv = to_csv(&december());
        assert!(csv.ends_with(",\"bring wine, cheese\""));
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn file_names_pad_the_month() {
        assert_eq!(ExportFormat::Json.file_name(2024, 3), "03-2024-events.json");
        assert_eq!(ExportFormat::Csv.file_name(2024, 12), "12-2024-events.csv");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn format_deserializes_like_it_parses() {
        let csv: ExportFormat = serde_json::from_str("\"CSV\"").unwrap();
        assert_eq!(csv, ExportFormat::Csv);
        let json: ExportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(json, ExportFormat::Json);
        assert!(serde_json::from_str::<ExportFormat>("\"xml\"").is_err());
        assert_eq!(serde_json::to_string(&ExportFormat::Csv).unwrap(), "\"csv\"");
    }

    #[test]
    fn save_to_writes_into_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_to(&dir.path().join("out"), "12-2024-events.csv", b"x").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x");
    }
}
