//! Same-day overlap detection.
//!
//! Ranges are half-open: an event from 09:00 to 10:00 and another from 10:00
//! to 11:00 touch but do not overlap. Only events whose start falls on the
//! candidate's [`DateKey`] are compared, so `existing` may safely hold events
//! from any number of days.

use crate::date_key::DateKey;
use crate::event::{Event, TimeRange};

/// Whether `candidate` clashes with at least one same-day event in `existing`.
pub fn overlaps<C>(candidate: &C, existing: &[Event]) -> bool
where
    C: TimeRange + ?Sized,
{
    same_day(candidate, existing).any(|event| ranges_overlap(candidate, event))
}

/// The same-day events in `existing` that `candidate` clashes with, in order.
pub fn conflicts<'a, C>(candidate: &C, existing: &'a [Event]) -> Vec<&'a Event>
where
    C: TimeRange + ?Sized,
{
    same_day(candidate, existing)
        .filter(|event| ranges_overlap(candidate, *event))
        .collect()
}

fn same_day<'a, C>(candidate: &C, existing: &'a [Event]) -> impl Iterator<Item = &'a Event>
where
    C: TimeRange + ?Sized,
{
    let day = DateKey::of(&candidate.start_time());
    existing
        .iter()
        .filter(move |event| DateKey::of(&event.start_time) == day)
}

fn ranges_overlap<A, B>(a: &A, b: &B) -> bool
where
    A: TimeRange + ?Sized,
    B: TimeRange + ?Sized,
{
    let (a_start, a_end) = (a.start_time(), a.end_time());
    let (b_start, b_end) = (b.start_time(), b.end_time());

    // Empty or inverted ranges occupy no time.
    if a_start >= a_end || b_start >= b_end {
        return false;
    }

    (a_start >= b_start && a_start < b_end) // starts during b
        || (a_end > b_start && a_end <= b_end) // ends during b
        || (a_start < b_start && a_end > b_end) // envelops b
}
