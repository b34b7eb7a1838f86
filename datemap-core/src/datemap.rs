//! Datemap data directory and loaded configuration.

use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::debug;

use crate::backend::FileBackend;
use crate::config::DatemapConfig;
use crate::error::{DateMapError, DateMapResult};
use crate::search::FuzzyMatcher;
use crate::store::{EventStore, StoreOptions};

#[derive(Debug, Clone)]
pub struct Datemap {
    config: DatemapConfig,
}

impl Datemap {
    /// Load ~/.config/datemap/config.toml, writing a commented default the
    /// first time. `DATEMAP_*` environment variables override file values.
    pub fn load() -> DateMapResult<Self> {
        let config_path = DatemapConfig::config_path()?;

        if !config_path.exists() {
            DatemapConfig::create_default_config(&config_path)?;
        }

        let config: DatemapConfig = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .add_source(Environment::with_prefix("DATEMAP").try_parsing(true))
            .build()
            .map_err(|e| DateMapError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DateMapError::Config(e.to_string()))?;

        debug!(path = %config_path.display(), "loaded config");

        Ok(Datemap { config })
    }

    pub fn from_config(config: DatemapConfig) -> Self {
        Datemap { config }
    }

    pub fn config(&self) -> &DatemapConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.config.data_dir)
    }

    /// Returns the data directory path in display-friendly form,
    /// keeping `~` instead of expanding to the full home directory.
    pub fn display_path(&self) -> PathBuf {
        self.config.data_dir.clone()
    }

    /// Directory month exports are written to.
    pub fn export_path(&self) -> PathBuf {
        self.config
            .export_dir
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            revalidate_on_update: self.config.revalidate_on_update,
        }
    }

    pub fn matcher(&self) -> FuzzyMatcher {
        FuzzyMatcher::new(self.config.search_threshold)
    }

    pub fn backend(&self) -> FileBackend {
        FileBackend::new(self.data_path())
    }

    pub fn open_store(&self) -> EventStore<FileBackend> {
        EventStore::load_with(self.backend(), self.store_options())
    }
}

fn expand(path: &std::path::Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
