use anyhow::Result;
use chrono::Local;
use datemap_core::{DateKey, Datemap};
use owo_colors::OwoColorize;

use crate::render::{Render, date_label};

pub fn run(datemap: &Datemap, date: DateKey) -> Result<()> {
    let store = datemap.open_store();
    let events = store.list_for_date(date);

    let today = Local::now().date_naive();
    println!("{} {}", date_label(date, today).bold(), date.to_string().dimmed());

    if events.is_empty() {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("  {}", event.render());
    }

    Ok(())
}
