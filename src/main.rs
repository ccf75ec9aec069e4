use anyhow::Result;
use ecommerce_ingest::{
    cli::{Cli, Commands, IngestArgs},
    config::Config,
    filter::resolve_tables,
    report::run_report,
    schema::ALL_TABLES,
    ui::{ConsoleUi, SilentUi, Ui},
    writer::ingest_to_sqlite,
};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn apply_paths(config: &mut Config, paths: IngestArgs) {
    if let Some(dir) = paths.data_dir {
        config.data_dir = dir;
    }
    if let Some(db) = paths.output_db {
        config.database = db;
    }
}

/// Carry out one command, reporting through `ui`
fn execute(command: Commands, mut config: Config, ui: &mut impl Ui) -> Result<()> {
    match command {
        Commands::Ingest {
            paths,
            include,
            exclude,
        } => {
            apply_paths(&mut config, paths);
            let tables = resolve_tables(include, exclude)?;

            let start = Instant::now();
            let report = ingest_to_sqlite(
                &config.data_dir,
                &config.database,
                &tables,
                config.store_options(),
                ui,
            )?;
            tracing::info!(
                rows = report.total_rows(),
                elapsed_secs = start.elapsed().as_secs_f64(),
                "Ingestion finished"
            );
        }

        Commands::Report { db, output } => {
            let db = db.unwrap_or(config.database);
            let output = output.unwrap_or(config.report_file);
            run_report(&db, &output, ui)?;
        }

        Commands::Run { paths, report } => {
            apply_paths(&mut config, paths);
            if let Some(report) = report {
                config.report_file = report;
            }

            ingest_to_sqlite(
                &config.data_dir,
                &config.database,
                ALL_TABLES,
                config.store_options(),
                ui,
            )?;
            run_report(&config.database, &config.report_file, ui)?;
        }

        Commands::ListTables => {
            ui.log("Tables in load order:\n");
            for table in ALL_TABLES {
                ui.log(format!("  {:<12} <- {}", table.name, table.source_file));
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    if cli.quiet {
        execute(cli.command, config, &mut SilentUi::new())
    } else {
        let mut ui = ConsoleUi::new(config.progress);
        execute(cli.command, config, &mut ui)
    }
}
