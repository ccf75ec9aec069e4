pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod report;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::IngestError;
pub use ui::{BufferedUi, ConsoleUi, Phase, SilentUi, Ui};
pub use writer::{ingest_to_sqlite, IngestReport, StoreOptions, TableOutcome};
