//! Raw event input, as typed into a form or passed on the command line.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::ValidationError;
use crate::event::{Event, EventDraft};

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Unvalidated event fields. Every field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventForm {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

impl EventForm {
    /// Pre-fill a form for editing `event`.
    pub fn from_event(event: &Event) -> Self {
        EventForm {
            name: event.name.clone(),
            start_time: event.start_time.format("%H:%M").to_string(),
            end_time: event.end_time.format("%H:%M").to_string(),
            description: event.description.clone().unwrap_or_default(),
        }
    }

    /// Validate the fields into a draft for `date`. Bare times are placed on
    /// `date`; full timestamps are taken as given.
    pub fn into_draft(self, date: DateKey) -> Result<EventDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.start_time.trim().is_empty() {
            return Err(ValidationError::MissingStartTime);
        }
        if self.end_time.trim().is_empty() {
            return Err(ValidationError::MissingEndTime);
        }

        let start = parse_time(&self.start_time, date)?;
        let end = parse_time(&self.end_time, date)?;
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }

        Ok(EventDraft::new(name, start, end).with_description(self.description.trim()))
    }
}

/// Parse `HH:MM[:SS]` on `date`, or a full `YYYY-MM-DDTHH:MM[:SS]` timestamp.
pub fn parse_time(input: &str, date: DateKey) -> Result<NaiveDateTime, ValidationError> {
    let input = input.trim();

    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(input, f).ok())
    {
        return Ok(date.date().and_time(time));
    }

    parse_timestamp(input)
}

/// Parse a full `YYYY-MM-DDTHH:MM[:SS]` timestamp; bare times are rejected.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let input = input.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
        .ok_or_else(|| ValidationError::InvalidTime(input.to_string()))
}
