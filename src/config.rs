//! Run configuration.
//!
//! Precedence, lowest first: built-in defaults, TOML config file, environment
//! variables, command-line flags (applied by `main`).

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::IngestError;
use crate::writer::StoreOptions;

pub const ENV_DATA_DIR: &str = "ECOMMERCE_DATA_DIR";
pub const ENV_DATABASE: &str = "ECOMMERCE_DB";
pub const ENV_REPORT: &str = "ECOMMERCE_REPORT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the five CSV files
    pub data_dir: PathBuf,
    /// SQLite store, recreated on every ingest
    pub database: PathBuf,
    /// Text report written by the `report` command
    pub report_file: PathBuf,
    pub enforce_foreign_keys: bool,
    pub strict_tables: bool,
    /// Show progress bars while loading
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database: PathBuf::from("ecommerce.db"),
            report_file: PathBuf::from("query_output.txt"),
            enforce_foreign_keys: false,
            strict_tables: true,
            progress: true,
        }
    }
}

impl Config {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit path must exist; the per-user default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// `<config dir>/ecommerce-ingest/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ecommerce-ingest")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(Self::from_toml(&contents, path)?)
    }

    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, IngestError> {
        toml::from_str(contents).map_err(|source| IngestError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override paths from environment variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(db) = lookup(ENV_DATABASE) {
            self.database = PathBuf::from(db);
        }
        if let Some(report) = lookup(ENV_REPORT) {
            self.report_file = PathBuf::from(report);
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            enforce_foreign_keys: self.enforce_foreign_keys,
            strict_tables: self.strict_tables,
        }
    }
}
