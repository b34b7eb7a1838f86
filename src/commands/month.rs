use anyhow::Result;
use chrono::Local;
use datemap_core::{Datemap, MonthView};
use owo_colors::OwoColorize;

use crate::render::{month_grid, pluralize};

pub fn run(datemap: &Datemap, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let current = MonthView::current();
    let view = MonthView::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?;

    let store = datemap.open_store();
    let counts = view.event_counts(&store.list_all());

    println!("{}", month_grid(&view, &counts, Local::now().date_naive()));

    if !counts.is_empty() {
        println!();
        for (day, count) in &counts {
            let Some(key) = view.date_key(*day) else {
                continue;
            };
            let label = format!("{} {}", count, pluralize("event", *count));
            println!("  {}  {}", key, label.dimmed());
        }
    }

    Ok(())
}
