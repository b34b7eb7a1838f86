//! Event types.
//!
//! An [`Event`] is what the store keeps; an [`EventDraft`] is the same thing
//! before it has been given an id, and an [`EventPatch`] is a partial edit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::date_key::DateKey;
use crate::error::ValidationError;

/// Anything with a `[start, end)` wall-clock range.
pub trait TimeRange {
    fn start_time(&self) -> NaiveDateTime;
    fn end_time(&self) -> NaiveDateTime;
}

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Assigned once on creation, never changes.
    pub id: String,
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Event {
    pub fn date_key(&self) -> DateKey {
        DateKey::of(&self.start_time)
    }

    /// Check the invariants every stored event must hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.start_time, self.end_time)
    }
}

impl TimeRange for Event {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }
}

/// A candidate event that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        EventDraft {
            name: name.into(),
            start_time,
            end_time,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn date_key(&self) -> DateKey {
        DateKey::of(&self.start_time)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.start_time, self.end_time)
    }

    pub(crate) fn into_event(self, id: String) -> Event {
        Event {
            id,
            name: self.name,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
        }
    }
}

impl TimeRange for EventDraft {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }
}

/// Partial update for an existing event. `None` leaves a field untouched;
/// an empty `description` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.description.is_none()
    }

    /// Merge the patch over `event`. The id is always kept.
    pub fn apply(&self, event: &Event) -> Event {
        let mut merged = event.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(start) = self.start_time {
            merged.start_time = start;
        }
        if let Some(end) = self.end_time {
            merged.end_time = end;
        }
        if let Some(description) = &self.description {
            merged.description = (!description.trim().is_empty()).then(|| description.clone());
        }
        merged
    }
}

/// An event together with the day it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedEvent {
    pub date: DateKey,
    #[serde(flatten)]
    pub event: Event,
}

fn check_fields(
    name: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if end <= start {
        return Err(ValidationError::EndNotAfterStart);
    }
    Ok(())
}

// Older blobs store a missing description as "".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
