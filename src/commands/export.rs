use std::path::PathBuf;

use anyhow::{Context, Result};
use datemap_core::export::{ExportFormat, month_records, save_to};
use datemap_core::{Datemap, MonthView};
use owo_colors::OwoColorize;

use crate::render::pluralize;

pub fn run(
    datemap: &Datemap,
    format: ExportFormat,
    year: Option<i32>,
    month: Option<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let current = MonthView::current();
    let view = MonthView::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?;

    let store = datemap.open_store();
    let records = month_records(&store.flatten(), view.year(), view.month());
    let contents = format.render(&records)?;

    let dir = output.unwrap_or_else(|| datemap.export_path());
    let file_name = format.file_name(view.year(), view.month());
    let path = save_to(&dir, &file_name, contents.as_bytes())
        .with_context(|| format!("Could not write {}", dir.join(&file_name).display()))?;

    println!(
        "{}",
        format!(
            "  Exported {} {} from {} to {}",
            records.len(),
            pluralize("event", records.len()),
            view.title(),
            path.display()
        )
        .green()
    );

    Ok(())
}
