use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecommerce-ingest")]
#[command(version, about = "Load e-commerce CSV files into SQLite and report on them")]
pub struct Cli {
    /// Config file (default: per-user config dir, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// No console output; warnings still go to stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More diagnostic logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the CSV files come from and where the store goes
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Directory containing the CSV files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Output SQLite database path (recreated)
    #[arg(short, long)]
    pub output_db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recreate the database and load the CSV files
    Ingest {
        #[command(flatten)]
        paths: IngestArgs,

        /// Only load these tables and their parents (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Skip these tables and their children (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// Run the analytics queries against an existing database
    Report {
        /// SQLite database to query
        #[arg(long)]
        db: Option<PathBuf>,

        /// Report output file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Ingest, then report
    Run {
        #[command(flatten)]
        paths: IngestArgs,

        /// Report output file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List tables in load order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
