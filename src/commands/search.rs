use anyhow::Result;
use chrono::Local;
use datemap_core::Datemap;
use datemap_core::search::{group_by_date, search};
use owo_colors::OwoColorize;

use crate::render::{Render, date_label};

pub fn run(datemap: &Datemap, query: &str) -> Result<()> {
    let store = datemap.open_store();
    let found = search(&store.flatten(), query, &datemap.matcher());

    if found.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let today = Local::now().date_naive();
    let grouped = group_by_date(found);

    for (i, (date, events)) in grouped.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", date_label(*date, today).bold(), date.to_string().dimmed());
        for event in events {
            println!("  {}", event.render());
        }
    }

    Ok(())
}
