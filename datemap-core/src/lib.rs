//! Core types for datemap.
//!
//! Events are kept per calendar day in an [`EventStore`] backed by a
//! key-value [`Backend`]. A new event is rejected when its time range
//! overlaps another event on the same day.
//!
//! - `overlap` holds the clash rules
//! - `search` and `export` work on the flattened event list
//! - `month` lays out a Sunday-first month grid

pub mod backend;
pub mod config;
pub mod date_key;
pub mod datemap;
pub mod error;
pub mod event;
pub mod export;
pub mod form;
pub mod month;
pub mod overlap;
pub mod search;
pub mod store;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use crate::config::DatemapConfig;
pub use date_key::DateKey;
pub use datemap::Datemap;
pub use error::{DateMapError, DateMapResult, ValidationError};
pub use event::{DatedEvent, Event, EventDraft, EventPatch, TimeRange};
pub use export::{ExportFormat, ExportRecord};
pub use form::EventForm;
pub use month::MonthView;
pub use search::{FuzzyMatcher, Matcher};
pub use store::{EventStore, EventsByDate, StoreOptions};
