//! Global datemap configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DateMapError, DateMapResult};
use crate::search::DEFAULT_THRESHOLD;

static DEFAULT_DATA_DIR: &str = "~/.datemap";

/// Keys accepted by [`DatemapConfig::set`].
pub const KEYS: [&str; 4] = [
    "data_dir",
    "search_threshold",
    "revalidate_on_update",
    "export_dir",
];

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_search_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Global configuration at ~/.config/datemap/config.toml
///
/// Every key may also be set through a `DATEMAP_<KEY>` environment variable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatemapConfig {
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_search_threshold")]
    pub search_threshold: f64,

    #[serde(default, skip_serializing_if = "is_false")]
    pub revalidate_on_update: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for DatemapConfig {
    fn default() -> Self {
        DatemapConfig {
            data_dir: default_data_dir(),
            search_threshold: DEFAULT_THRESHOLD,
            revalidate_on_update: false,
            export_dir: None,
        }
    }
}

impl DatemapConfig {
    pub fn config_path() -> DateMapResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DateMapError::Config("Could not determine config directory".into()))?
            .join("datemap");

        Ok(config_dir.join("config.toml"))
    }

    /// Read just the config file, without environment overrides. A missing
    /// file gives the defaults.
    pub fn load_from(path: &Path) -> DateMapResult<Self> {
        if !path.exists() {
            return Ok(DatemapConfig::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| DateMapError::Config(format!("Could not read config file: {e}")))?;
        toml::from_str(&contents).map_err(|e| DateMapError::Config(e.to_string()))
    }

    /// Set one key from its textual value, as given on the command line.
    /// An empty `export_dir` unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> DateMapResult<()> {
        let invalid = |expected: &str| {
            DateMapError::Config(format!("Invalid value '{value}' for {key}. Expected {expected}"))
        };

        match key {
            "data_dir" if !value.trim().is_empty() => self.data_dir = PathBuf::from(value.trim()),
            "data_dir" => return Err(invalid("a directory")),
            "search_threshold" => {
                let threshold: f64 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("a number from 0.0 to 1.0"))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(invalid("a number from 0.0 to 1.0"));
                }
                self.search_threshold = threshold;
            }
            "revalidate_on_update" => {
                self.revalidate_on_update =
                    value.trim().parse().map_err(|_| invalid("true or false"))?;
            }
            "export_dir" => {
                let value = value.trim();
                self.export_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => {
                return Err(DateMapError::Config(format!(
                    "Unknown config key '{other}'. Expected one of: {}",
                    KEYS.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Save the current config to ~/.config/datemap/config.toml
    pub fn save(&self) -> DateMapResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> DateMapResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DateMapError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DateMapError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| DateMapError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DateMapResult<()> {
        let contents = format!(
            "\
# datemap configuration

# Where events are stored:
# data_dir = \"{}\"

# How loosely search queries may match (0.0 = exact, 1.0 = anything):
# search_threshold = {}

# Re-check overlaps when an event is edited:
# revalidate_on_update = false

# Where month exports are written (defaults to the current directory):
# export_dir = \"~/Downloads\"
",
            DEFAULT_DATA_DIR, DEFAULT_THRESHOLD
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DateMapError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DateMapError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
