use anyhow::Result;
use datemap_core::backend::EVENTS_KEY;
use datemap_core::{Datemap, DatemapConfig};
use owo_colors::OwoColorize;

pub fn run(datemap: &Datemap) -> Result<()> {
    let config_path = DatemapConfig::config_path()?;
    let config = datemap.config();

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data:       {}", datemap.display_path().display());
    println!(
        "  Events:     {}",
        datemap.backend().path_for(EVENTS_KEY).display()
    );
    println!("  Exports:    {}", datemap.export_path().display());

    println!();
    println!("{}", "Settings".bold());
    println!("  search_threshold:      {}", config.search_threshold);
    println!("  revalidate_on_update:  {}", config.revalidate_on_update);

    Ok(())
}

/// Change one key in the config file. Environment overrides are neither read
/// nor written back.
pub fn set(key: &str, value: &str) -> Result<()> {
    let config_path = DatemapConfig::config_path()?;
    let mut config = DatemapConfig::load_from(&config_path)?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {key} in {}", "Updated".green(), config_path.display());

    Ok(())
}
