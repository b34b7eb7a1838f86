//! TUI rendering for datemap types.
//!
//! Extension trait that adds colored terminal output to datemap-core types
//! using owo_colors.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use datemap_core::{DateKey, Event, MonthView};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );
        let mut line = format!("{} {}", time.dimmed(), self.name);
        if let Some(description) = &self.description {
            line.push_str(&format!("  {}", description.dimmed()));
        }
        line.push_str(&format!("  {}", self.id.dimmed()));
        line
    }
}

/// Human label for a day heading (e.g. "Today", "Tomorrow", "Wed Dec 11 2024").
pub fn date_label(date: DateKey, today: NaiveDate) -> String {
    match (date.date() - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.date().format("%a %b %-d %Y").to_string(),
    }
}

/// Month grid with Sunday-first weeks. Today is reversed, weekends dimmed and
/// days with events bold green.
pub fn month_grid(view: &MonthView, counts: &BTreeMap<u32, usize>, today: NaiveDate) -> String {
    let mut lines = vec![format!("{:^20}", view.title()).bold().to_string()];
    lines.push("Su Mo Tu We Th Fr Sa".to_string());

    for week in view.cells().chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "  ".to_string(),
                Some(day) => {
                    let label = format!("{:>2}", day);
                    if view.is_today(*day, today) {
                        label.reversed().to_string()
                    } else if counts.contains_key(day) {
                        label.green().bold().to_string()
                    } else if view.is_weekend(*day) {
                        label.dimmed().to_string()
                    } else {
                        label
                    }
                }
            })
            .collect();
        lines.push(cells.join(" "));
    }

    lines.join("\n")
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
