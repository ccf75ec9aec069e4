//! Typed errors for the ingestion library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or loading the store.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The store file could not be removed or created. Fatal for a run.
    #[error("Failed to create store at {path:?}: {source}")]
    StoreCreate {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source file exists but could not be read
    #[error("Failed to read {path:?}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The insert statement for a table could not be prepared
    #[error("Cannot prepare insert for {table}: {source}")]
    PrepareInsert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A table name given on the command line does not exist
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// The configuration file is malformed
    #[error("Invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
