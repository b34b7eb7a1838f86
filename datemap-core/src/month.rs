//! Month grid computations.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, Months, NaiveDate, Weekday};

use crate::date_key::DateKey;
use crate::error::ValidationError;
use crate::store::EventsByDate;

/// One calendar month, laid out in Sunday-first weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| MonthView { first })
            .ok_or(ValidationError::InvalidYear(year))
    }

    pub fn containing(date: NaiveDate) -> Self {
        MonthView {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// e.g. "December 2024"
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| MonthView { first })
            .unwrap_or(*self)
    }

    pub fn prev(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| MonthView { first })
            .unwrap_or(*self)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        if next == *self {
            // Last representable month.
            return 31;
        }
        (next.first - self.first).num_days() as u32
    }

    /// Weekday of the 1st, Sunday = 0.
    pub fn first_weekday(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Grid cells: a blank for every weekday before the 1st, then the days.
    pub fn cells(&self) -> Vec<Option<u32>> {
        let blanks = std::iter::repeat_n(None, self.first_weekday() as usize);
        blanks.chain((1..=self.days_in_month()).map(Some)).collect()
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn date_key(&self, day: u32) -> Option<DateKey> {
        self.date(day).map(DateKey::from_date)
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        key.year() == self.year() && key.month() == self.month()
    }

    pub fn is_weekend(&self, day: u32) -> bool {
        self.date(day)
            .is_some_and(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
    }

    pub fn is_today(&self, day: u32, today: NaiveDate) -> bool {
        self.date(day) == Some(today)
    }

    /// Number of events per day of this month, only for days that have any.
    pub fn event_counts(&self, days: &EventsByDate) -> BTreeMap<u32, usize> {
        days.iter()
            .filter(|(key, events)| self.contains(key) && !events.is_empty())
            .map(|(key, events)| (key.day(), events.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventDraft};

    #[test]
    fn december_2024_starts_on_sunday() {
        let view = MonthView::new(2024, 12).unwrap();
        let cells = view.cells();
        assert_eq!(view.first_weekday(), 0);
        assert_eq!(cells.first(), Some(&Some(1)));
        assert_eq!(cells.len(), 31);
    }

    #[test]
    fn february_2025_has_six_leading_blanks() {
        let view = MonthView::new(2025, 2).unwrap();
        let cells = view.cells();
        assert_eq!(view.days_in_month(), 28);
        assert!(cells[..6].iter().all(Option::is_none));
        assert_eq!(cells[6], Some(1));
        assert_eq!(cells.last(), Some(&Some(28)));
    }

    #[test]
    fn leap_february() {
        assert_eq!(MonthView::new(2024, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn navigation_wraps_years() {
        let dec = MonthView::new(2024, 12).unwrap();
        assert_eq!(dec.next(), MonthView::new(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(MonthView::new(2024, 1).unwrap().prev().title(), "December 2023");
    }

    #[test]
    fn rejects_month_thirteen() {
        assert_eq!(MonthView::new(2024, 13), Err(ValidationError::InvalidMonth(13)));
        assert_eq!(MonthView::new(2024, 0), Err(ValidationError::InvalidMonth(0)));
    }

    #[test]
    fn rejects_years_chrono_cannot_represent() {
        assert_eq!(
            MonthView::new(300_000, 6),
            Err(ValidationError::InvalidYear(300_000))
        );
        assert_eq!(
            MonthView::new(300_000, 13),
            Err(ValidationError::InvalidMonth(13))
        );
    }

    #[test]
    fn weekends_and_today() {
        let view = MonthView::new(2024, 12).unwrap();
        assert!(view.is_weekend(1)); // Sunday
        assert!(view.is_weekend(7)); // Saturday
        assert!(!view.is_weekend(10));
        assert!(!view.is_weekend(40));

        let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
        assert!(view.is_today(10, today));
        assert!(!view.is_today(11, today));
    }

    #[test]
    fn counts_events_in_this_month_only() {
        let event = |date: NaiveDate| -> Event {
            EventDraft::new(
                "x",
                date.and_hms_opt(9, 0, 0).unwrap(),
                date.and_hms_opt(10, 0, 0).unwrap(),
            )
            .into_event(date.to_string())
        };
        let dec_10 = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
        let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let mut days = EventsByDate::new();
        days.insert(dec_10.into(), vec![event(dec_10), event(dec_10)]);
        days.insert(jan_1.into(), vec![event(jan_1)]);

        let counts = MonthView::new(2024, 12).unwrap().event_counts(&days);
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(10, 2)]);
    }
}
