//! Fuzzy event search.
//!
//! A query matches an event when it approximately appears in the event's
//! name, description or date. [`FuzzyMatcher`] scores a field by the fewest
//! edits needed to turn the query into some substring of it, relative to the
//! query length: `0.0` is an exact substring, `1.0` shares nothing.

use std::collections::BTreeMap;

use crate::date_key::DateKey;
use crate::event::{DatedEvent, Event};

/// Default cut-off score for a match.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Decides whether a query matches a piece of text.
pub trait Matcher {
    /// Score of `pattern` against `text`, or `None` when it does not match.
    fn score(&self, pattern: &str, text: &str) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    /// `threshold` is clamped to `0.0..=1.0`.
    pub fn new(threshold: f64) -> Self {
        FuzzyMatcher {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        FuzzyMatcher::new(DEFAULT_THRESHOLD)
    }
}

impl Matcher for FuzzyMatcher {
    fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
        if pattern.is_empty() {
            return Some(0.0);
        }
        let text: Vec<char> = text.to_lowercase().chars().collect();

        let score = substring_distance(&pattern, &text) as f64 / pattern.len() as f64;
        (score <= self.threshold).then_some(score)
    }
}

/// Smallest edit distance between `pattern` and any substring of `text`.
fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    // prev[i]: cost of matching pattern[..i] ending at the previous text char.
    let mut prev: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = pattern.len();

    for &t in text {
        let mut current = vec![0; pattern.len() + 1];
        for (i, &p) in pattern.iter().enumerate() {
            let substitute = prev[i] + usize::from(p != t);
            let skip_text = prev[i + 1] + 1;
            let skip_pattern = current[i] + 1;
            current[i + 1] = substitute.min(skip_text).min(skip_pattern);
        }
        best = best.min(current[pattern.len()]);
        prev = current;
    }

    best
}

/// Records whose name, description or date match `query`, in their original
/// order. A blank query returns every record.
pub fn search<M>(records: &[DatedEvent], query: &str, matcher: &M) -> Vec<DatedEvent>
where
    M: Matcher + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| best_score(record, query, matcher).is_some())
        .cloned()
        .collect()
}

fn best_score<M>(record: &DatedEvent, query: &str, matcher: &M) -> Option<f64>
where
    M: Matcher + ?Sized,
{
    let date = record.date.to_string();
    [
        Some(record.event.name.as_str()),
        record.event.description.as_deref(),
        Some(date.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|field| matcher.score(query, field))
    .reduce(f64::min)
}

/// Group records by day, keeping their order within each day.
pub fn group_by_date(records: Vec<DatedEvent>) -> BTreeMap<DateKey, Vec<Event>> {
    let mut grouped: BTreeMap<DateKey, Vec<Event>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.date).or_default().push(record.event);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, name: &str, description: Option<&str>) -> DatedEvent {
        let day: NaiveDate = date.parse().unwrap();
        DatedEvent {
            date: date.parse().unwrap(),
            event: Event {
                id: format!("{date}-{name}"),
                name: name.to_string(),
                start_time: day.and_hms_opt(9, 0, 0).unwrap(),
                end_time: day.and_hms_opt(10, 0, 0).unwrap(),
                description: description.map(String::from),
            },
        }
    }

    fn records() -> Vec<DatedEvent> {
        vec![
            record("2024-12-02", "Team meeting", Some("quarterly planning")),
            record("2024-12-10", "Dentist", None),
            record("2024-12-10", "Lunch with Sam", Some("the ramen place")),
            record("1999-07-19", "Gym", Some("leg day")),
        ]
    }

    fn names(found: &[DatedEvent]) -> Vec<&str> {
        found.iter().map(|r| r.event.name.as_str()).collect()
    }

    #[test]
    fn exact_substring_scores_zero() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.score("meet", "Team meeting"), Some(0.0));
    }

    #[test]
    fn one_typo_is_tolerated() {
        let matcher = FuzzyMatcher::default();
        let score = matcher.score("dentsit", "Dentist").unwrap();
        assert!(score > 0.0 && score <= DEFAULT_THRESHOLD);
        assert!(matcher.score("meetng", "Team meeting").is_some());
    }

    #[test]
    fn unrelated_text_does_not_match() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.score("xyz", "Lunch"), None);
        assert_eq!(matcher.score("q", "Lunch"), None);
    }

    #[test]
    fn distance_is_measured_against_the_best_substring() {
        let pattern: Vec<char> = "ramen".chars().collect();
        let text: Vec<char> = "the ramen place".chars().collect();
        assert_eq!(substring_distance(&pattern, &text), 0);

        let text: Vec<char> = "the rmen place".chars().collect();
        assert_eq!(substring_distance(&pattern, &text), 1);
    }

    #[test]
    fn blank_query_returns_everything() {
        let all = records();
        assert_eq!(search(&all, "   ", &FuzzyMatcher::default()), all);
    }

    #[test]
    fn searches_name_description_and_date() {
        let all = records();
        let matcher = FuzzyMatcher::default();

        assert_eq!(names(&search(&all, "dentist", &matcher)), vec!["Dentist"]);
        assert_eq!(names(&search(&all, "ramen", &matcher)), vec!["Lunch with Sam"]);
        assert_eq!(names(&search(&all, "1999-07", &matcher)), vec!["Gym"]);
    }

    #[test]
    fn results_keep_original_order() {
        let all = records();
        let found = search(&all, "2024-12", &FuzzyMatcher::default());
        assert_eq!(names(&found), vec!["Team meeting", "Dentist", "Lunch with Sam"]);
    }

    #[test]
    fn stricter_threshold_drops_typos() {
        let all = records();
        assert!(search(&all, "dentsit", &FuzzyMatcher::new(0.0)).is_empty());
    }

    #[test]
    fn groups_by_day() {
        let grouped = group_by_date(records());
        let dec_10: DateKey = "2024-12-10".parse().unwrap();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[&dec_10].len(), 2);
        assert_eq!(grouped[&dec_10][1].name, "Lunch with Sam");
    }
}
