use anyhow::Result;
use datemap_core::{DateKey, Datemap};
use owo_colors::OwoColorize;

pub fn run(datemap: &Datemap, id: &str, date: Option<DateKey>) -> Result<()> {
    let mut store = datemap.open_store();

    let found = match date {
        Some(date) => store
            .list_for_date(date)
            .into_iter()
            .find(|e| e.id == id)
            .map(|event| (date, event.name)),
        None => store.find(id).map(|found| (found.date, found.event.name)),
    };

    let Some((date, name)) = found else {
        println!("{}", format!("  Event '{}' not found", id).yellow());
        return Ok(());
    };

    if store.delete(date, id)? {
        println!("{}", format!("  Deleted: {} ({})", name, date).red());
    }

    Ok(())
}
