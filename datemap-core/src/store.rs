//! The per-day event store.
//!
//! Events live in a `DateKey → Vec<Event>` map, each day in insertion order.
//! The whole map is written back to the [`Backend`] after every successful
//! mutation. A failed write rolls the in-memory change back, so callers only
//! ever observe fully applied operations.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::{Backend, EVENTS_KEY};
use crate::date_key::DateKey;
use crate::error::{DateMapError, DateMapResult, ValidationError};
use crate::event::{DatedEvent, Event, EventDraft, EventPatch};
use crate::form::{parse_time, parse_timestamp};
use crate::overlap::conflicts;

/// Where an unreadable blob is copied before the store starts over empty.
pub const UNREADABLE_KEY: &str = "events.unreadable";

/// Snapshot of the store: every day with its events.
pub type EventsByDate = BTreeMap<DateKey, Vec<Event>>;

/// Behaviour switches for [`EventStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Re-run the overlap check against sibling events on update.
    pub revalidate_on_update: bool,
}

pub struct EventStore<B: Backend> {
    backend: B,
    days: EventsByDate,
    options: StoreOptions,
}

impl<B: Backend> EventStore<B> {
    pub fn load(backend: B) -> Self {
        Self::load_with(backend, StoreOptions::default())
    }

    /// Read the persisted blob. A missing or unreadable blob yields an empty
    /// store; an unreadable one is copied to [`UNREADABLE_KEY`] first so the
    /// next write cannot destroy it.
    pub fn load_with(mut backend: B, options: StoreOptions) -> Self {
        let days = match backend.get(EVENTS_KEY) {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(days) => days,
                Err(e) => {
                    warn!(error = %e, "stored events are unreadable, starting empty");
                    if let Err(e) = backend.set(UNREADABLE_KEY, &raw) {
                        warn!(error = %e, "could not keep a copy of the unreadable events");
                    }
                    EventsByDate::new()
                }
            },
            Ok(None) => EventsByDate::new(),
            Err(e) => {
                warn!(error = %e, "could not read stored events, starting empty");
                EventsByDate::new()
            }
        };

        debug!(days = days.len(), "loaded event store");

        EventStore {
            backend,
            days,
            options,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `draft` to `date`, rejecting it if it overlaps a same-day event.
    pub fn create(&mut self, date: DateKey, draft: EventDraft) -> DateMapResult<Event> {
        draft.validate()?;
        ensure_on_day(date, draft.date_key())?;

        let clashing = names(conflicts(&draft, self.day(date)));
        if !clashing.is_empty() {
            debug!(%date, conflicts = ?clashing, "rejected overlapping event");
            return Err(DateMapError::Overlap {
                date,
                conflicts: clashing,
            });
        }

        let event = draft.into_event(self.fresh_id());
        let stored = event.clone();
        self.commit(date, move |events| events.push(stored))?;

        debug!(%date, id = %event.id, "created event");
        Ok(event)
    }

    /// Merge `patch` into the event `id` on `date`, keeping its position.
    ///
    /// Sibling events are only re-checked for overlap when
    /// [`StoreOptions::revalidate_on_update`] is set.
    pub fn update(&mut self, date: DateKey, id: &str, patch: &EventPatch) -> DateMapResult<Event> {
        let index = self.position(date, id).ok_or_else(|| DateMapError::NotFound {
            date,
            id: id.to_string(),
        })?;

        let day = self.day(date);
        let updated = patch.apply(&day[index]);
        updated.validate()?;
        ensure_on_day(date, updated.date_key())?;

        if self.options.revalidate_on_update {
            let siblings: Vec<Event> = day.iter().filter(|e| e.id != id).cloned().collect();
            let clashing = names(conflicts(&updated, &siblings));
            if !clashing.is_empty() {
                return Err(DateMapError::Overlap {
                    date,
                    conflicts: clashing,
                });
            }
        }

        let stored = updated.clone();
        self.commit(date, move |events| events[index] = stored)?;

        debug!(%date, %id, "updated event");
        Ok(updated)
    }

    /// Remove the event `id` from `date`. Returns whether anything was removed;
    /// an unknown id leaves the store (and the persisted blob) untouched.
    pub fn delete(&mut self, date: DateKey, id: &str) -> DateMapResult<bool> {
        let Some(index) = self.position(date, id) else {
            debug!(%date, %id, "nothing to delete");
            return Ok(false);
        };

        self.commit(date, move |events| {
            events.remove(index);
        })?;

        debug!(%date, %id, "deleted event");
        Ok(true)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn list_for_date(&self, date: DateKey) -> Vec<Event> {
        self.day(date).to_vec()
    }

    pub fn list_all(&self) -> EventsByDate {
        self.days.clone()
    }

    /// Every event with its day, days ascending, insertion order within a day.
    pub fn flatten(&self) -> Vec<DatedEvent> {
        self.days
            .iter()
            .flat_map(|(date, events)| {
                events.iter().map(|event| DatedEvent {
                    date: *date,
                    event: event.clone(),
                })
            })
            .collect()
    }

    /// Look an event up by id on any day.
    pub fn find(&self, id: &str) -> Option<DatedEvent> {
        self.days.iter().find_map(|(date, events)| {
            events.iter().find(|e| e.id == id).map(|event| DatedEvent {
                date: *date,
                event: event.clone(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn day(&self, date: DateKey) -> &[Event] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    fn position(&self, date: DateKey, id: &str) -> Option<usize> {
        self.day(date).iter().position(|e| e.id == id)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.days.values().flatten().any(|e| e.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    /// Apply `change` to one day and persist; undo it if the write fails.
    fn commit(&mut self, date: DateKey, change: impl FnOnce(&mut Vec<Event>)) -> DateMapResult<()> {
        let previous = self.days.get(&date).cloned();

        let events = self.days.entry(date).or_default();
        change(events);
        if events.is_empty() {
            self.days.remove(&date);
        }

        if let Err(e) = self.persist() {
            match previous {
                Some(events) => self.days.insert(date, events),
                None => self.days.remove(&date),
            };
            return Err(e);
        }

        Ok(())
    }

    fn persist(&mut self) -> DateMapResult<()> {
        let blob = encode(&self.days)?;
        self.backend.set(EVENTS_KEY, &blob)
    }
}

fn ensure_on_day(expected: DateKey, actual: DateKey) -> Result<(), ValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ValidationError::DateMismatch { expected, actual })
    }
}

fn names(events: Vec<&Event>) -> Vec<String> {
    events.into_iter().map(|e| e.name.clone()).collect()
}

// =============================================================================
// Blob encoding
// =============================================================================

/// Both shapes the events blob has been written in.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEvents {
    ByDate(BTreeMap<String, Vec<StoredEvent>>),
    Flat(Vec<StoredEvent>),
}

/// An event as any version of the app wrote it. The first version kept bare
/// `HH:MM` times and left the day to the enclosing key (or, in the flat
/// shape, to the event's own `date`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    id: String,
    name: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl StoredEvent {
    /// Full timestamps are kept as written; bare times are placed on `day`.
    fn into_event(self, day: Option<DateKey>) -> Result<Event, ValidationError> {
        let resolve = |time: &str| -> Result<NaiveDateTime, ValidationError> {
            if let Ok(timestamp) = time.trim().parse::<NaiveDateTime>() {
                return Ok(timestamp);
            }
            match day {
                Some(day) => parse_time(time, day),
                None => parse_timestamp(time),
            }
        };

        Ok(Event {
            start_time: resolve(&self.start_time)?,
            end_time: resolve(&self.end_time)?,
            id: self.id,
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Parse a day key of the first app version, `year-monthIndex-day` with a
/// zero-based, unpadded month (`2025-0-5` is January 5th).
fn zero_based_day(key: &str) -> Option<DateKey> {
    let mut parts = key.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month.checked_add(1)?, day).map(DateKey::from_date)
}

/// Decode either shape, filing every event under the day it starts on.
///
/// Keys found in the blob only matter for events with bare times, and those
/// were only ever written under zero-based keys. An event whose day cannot
/// be worked out makes the whole blob unreadable rather than being dropped.
fn decode(raw: &str) -> DateMapResult<EventsByDate> {
    let stored: StoredEvents =
        serde_json::from_str(raw).map_err(|e| DateMapError::Serialization(e.to_string()))?;

    let placed: Vec<(Option<DateKey>, StoredEvent)> = match stored {
        StoredEvents::ByDate(by_date) => by_date
            .into_iter()
            .flat_map(|(key, events)| {
                let day = zero_based_day(&key);
                events.into_iter().map(move |event| (day, event))
            })
            .collect(),
        StoredEvents::Flat(events) => events
            .into_iter()
            .map(|event| (event.date.as_deref().and_then(zero_based_day), event))
            .collect(),
    };

    let mut days = EventsByDate::new();
    for (day, stored) in placed {
        let event = stored.into_event(day)?;
        days.entry(event.date_key()).or_default().push(event);
    }
    Ok(days)
}

fn encode(days: &EventsByDate) -> DateMapResult<String> {
    serde_json::to_string_pretty(days).map_err(|e| DateMapError::Serialization(e.to_string()))
}
