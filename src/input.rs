//! Parsing of dates and durations typed on the command line.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use datemap_core::DateKey;

/// Parse `YYYY-MM-DD`, falling back to natural phrases ("today", "next fri").
pub fn parse_date(input: &str) -> Result<DateKey> {
    if let Ok(key) = input.trim().parse::<DateKey>() {
        return Ok(key);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))?;

    Ok(DateKey::from_date(dt.date()))
}

/// Parse a humantime duration such as "45m" or "1h 30m".
pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input.trim())
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

pub fn end_after(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    let duration = parse_duration(input)?;
    start
        .checked_add_signed(duration)
        .context("Duration too large")
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("tmrw", "tomorrow"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
