use anyhow::Result;
use datemap_core::form::parse_time;
use datemap_core::{DateKey, DateMapError, Datemap, EventPatch};
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct EditArgs {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
}

pub fn run(datemap: &Datemap, id: &str, date: Option<DateKey>, args: EditArgs) -> Result<()> {
    let mut store = datemap.open_store();

    let Some(date) = date.or_else(|| store.find(id).map(|found| found.date)) else {
        println!("{}", format!("  Event '{}' not found", id).yellow());
        return Ok(());
    };

    let patch = EventPatch {
        name: args.name,
        start_time: args.start.map(|s| parse_time(&s, date)).transpose()?,
        end_time: args.end.map(|s| parse_time(&s, date)).transpose()?,
        description: args.description,
    };

    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Pass --name, --start, --end or --description");
    }

    match store.update(date, id, &patch) {
        Ok(event) => {
            println!("{}", format!("  Updated on {}:", date).green());
            println!("  {}", event.render());
            Ok(())
        }
        Err(DateMapError::NotFound { date, id }) => {
            println!("{}", format!("  Event '{}' not found on {}", id, date).yellow());
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
