use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use datemap_core::form::parse_time;
use datemap_core::{DateKey, DateMapError, Datemap, EventForm};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::input::end_after;
use crate::render::Render;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct AddArgs {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

pub fn run(datemap: &Datemap, date: DateKey, args: AddArgs) -> Result<()> {
    let interactive = args.name.is_none() || args.start.is_none();

    // --- Name ---
    let name = match args.name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("  Name")
            .interact_text()?,
    };

    // --- Start ---
    let start = match args.start {
        Some(s) => s,
        None => prompt_with_retry("  Starts at (HH:MM)", |input| {
            parse_time(input, date)?;
            Ok(input.to_string())
        })?,
    };

    // --- End / Duration ---
    let end = if let Some(end) = args.end {
        end
    } else if let Some(duration) = args.duration {
        let start_time = parse_time(&start, date)?;
        end_after(start_time, &duration)?
            .format(TIMESTAMP_FORMAT)
            .to_string()
    } else if interactive {
        let start_time = parse_time(&start, date)?;
        prompt_end(start_time, date)?
    } else {
        default_end(parse_time(&start, date)?)
    };

    // --- Description ---
    let description = match args.description {
        Some(d) => d,
        None if interactive => Input::new()
            .with_prompt("  Description (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
        None => String::new(),
    };

    let form = EventForm {
        name,
        start_time: start,
        end_time: end,
        description,
    };
    let draft = form.into_draft(date)?;

    let mut store = datemap.open_store();
    match store.create(date, draft) {
        Ok(event) => {
            if interactive {
                println!();
            }
            println!("{}", format!("  Created on {}:", date).green());
            println!("  {}", event.render());
            Ok(())
        }
        Err(DateMapError::Overlap { conflicts, .. }) => {
            anyhow::bail!(
                "This event overlaps with an existing event: {}",
                conflicts.join(", ")
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<String>
where
    F: Fn(&str) -> Result<String>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Ask for an end time or a duration; blank means one hour.
fn prompt_end(start: NaiveDateTime, date: DateKey) -> Result<String> {
    loop {
        let input: String = Input::new()
            .with_prompt("  Until? (HH:MM or duration, 1 hour)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(default_end(start));
        }
        match parse_end(&input, start, date) {
            Ok(end) => return Ok(end),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Try a time of day first, then a duration.
fn parse_end(input: &str, start: NaiveDateTime, date: DateKey) -> Result<String> {
    if parse_time(input, date).is_ok() {
        return Ok(input.to_string());
    }
    Ok(end_after(start, input)?.format(TIMESTAMP_FORMAT).to_string())
}

fn default_end(start: NaiveDateTime) -> String {
    (start + Duration::hours(1)).format(TIMESTAMP_FORMAT).to_string()
}
