use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::error::IngestError;
use crate::parser::{parse_csv, ParsedRow};
use crate::schema::{TableSchema, ALL_TABLES};
use crate::ui::{Phase, Ui};

/// How the store is set up
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Let SQLite reject rows with dangling foreign keys
    pub enforce_foreign_keys: bool,
    /// Declare tables STRICT so mistyped values fail their row
    pub strict_tables: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            enforce_foreign_keys: false,
            strict_tables: true,
        }
    }
}

/// Counts for one loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: u64,
    pub rows_inserted: u64,
    pub rows_failed: u64,
}

/// What happened to one table during ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum TableOutcome {
    Loaded(LoadSummary),
    /// Source file does not exist
    Missing,
    /// Source file has no data rows
    Empty,
    /// Table skipped because of a table-level error
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: &'static str,
    /// `None` when the table was not selected for loading
    pub outcome: Option<TableOutcome>,
    /// Row count after all loads
    pub row_count: u64,
}

/// Result of a full ingestion run
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub database: PathBuf,
    pub tables: Vec<TableReport>,
}

impl IngestReport {
    pub fn row_count(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| t.row_count)
    }

    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.row_count).sum()
    }
}

pub struct SqliteWriter {
    conn: Connection,
    options: StoreOptions,
}

impl SqliteWriter {
    /// Create a fresh store at `db_path`, removing any existing file first
    pub fn create(db_path: &Path, options: StoreOptions) -> Result<Self, IngestError> {
        let store_err = |source: Box<dyn std::error::Error + Send + Sync>| IngestError::StoreCreate {
            path: db_path.to_path_buf(),
            source,
        };

        if db_path.exists() {
            std::fs::remove_file(db_path).map_err(|e| store_err(Box::new(e)))?;
        }

        let conn = Connection::open(db_path).map_err(|e| store_err(Box::new(e)))?;
        Self::with_connection(conn, options)
    }

    /// Store backed by memory, for tests and dry runs
    pub fn in_memory(options: StoreOptions) -> Result<Self, IngestError> {
        Self::with_connection(Connection::open_in_memory()?, options)
    }

    fn with_connection(conn: Connection, options: StoreOptions) -> Result<Self, IngestError> {
        let foreign_keys = if options.enforce_foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = {};
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
            foreign_keys
        ))?;
        tracing::debug!(foreign_keys, strict = options.strict_tables, "Store opened");

        Ok(Self { conn, options })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            let sql = generate_create_table(schema, self.options.strict_tables);
            tracing::debug!(%sql, "Creating table");
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        Ok(())
    }

    /// Load one CSV file into its table.
    ///
    /// All rows go into a single transaction. A row that fails to insert is
    /// reported and skipped; the rest of the batch still commits.
    pub fn import_table(
        &mut self,
        schema: &TableSchema,
        data_dir: &Path,
        ui: &mut impl Ui,
    ) -> Result<TableOutcome, IngestError> {
        let file_path = data_dir.join(schema.source_file);

        if !file_path.exists() {
            tracing::warn!(table = schema.name, file = %file_path.display(), "Source file missing");
            ui.log(format!(
                "Warning: {} not found. Skipping...",
                schema.source_file
            ));
            return Ok(TableOutcome::Missing);
        }

        let content =
            std::fs::read_to_string(&file_path).map_err(|source| IngestError::ReadSource {
                path: file_path.clone(),
                source,
            })?;
        let csv = parse_csv(&content);

        if csv.is_empty() {
            tracing::warn!(table = schema.name, "Source file empty");
            ui.log(format!("Warning: {} is empty. Skipping...", schema.source_file));
            return Ok(TableOutcome::Empty);
        }

        let insert_sql = generate_insert(schema.name, &csv.columns);
        tracing::debug!(table = schema.name, sql = %insert_sql, "Prepared insert");

        let total = csv.rows.len() as u64;
        let mut summary = LoadSummary {
            rows_read: total,
            rows_inserted: 0,
            rows_failed: 0,
        };

        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare(&insert_sql)
                    .map_err(|source| IngestError::PrepareInsert {
                        table: schema.name.to_string(),
                        source,
                    })?;

            for (idx, row) in csv.rows.iter().enumerate() {
                match insert_row(&mut stmt, row) {
                    Ok(()) => summary.rows_inserted += 1,
                    Err(e) => {
                        summary.rows_failed += 1;
                        tracing::warn!(table = schema.name, line = row.line, error = %e, "Row rejected");
                        ui.log(format!(
                            "Error inserting row into {} (line {}): {}",
                            schema.name, row.line, e
                        ));
                        ui.log(format!("Row data: {}", row.describe(&csv.columns)));
                    }
                }
                ui.set_progress(idx as u64 + 1, total, schema.name);
            }
        }
        tx.commit()?;
        ui.clear_progress();

        ui.log(format!(
            "Loaded {} rows from {} into {}",
            summary.rows_read, schema.source_file, schema.name
        ));

        Ok(TableOutcome::Loaded(summary))
    }

    pub fn count_rows(&self, table: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to count rows in {}", table))?;
        Ok(count as u64)
    }

    /// Optimize and close the store
    pub fn close(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }
}

fn insert_row(stmt: &mut rusqlite::Statement, row: &ParsedRow) -> rusqlite::Result<()> {
    for (idx, value) in row.values.iter().enumerate() {
        value.bind_to(idx + 1, stmt)?;
    }
    stmt.raw_execute()?;
    Ok(())
}

/// Recreate the store at `output_db` and load the selected tables from `data_dir`.
///
/// `tables` must be in load order. The full schema is always created and every
/// table is counted at the end, whether or not it was selected.
pub fn ingest_to_sqlite(
    data_dir: &Path,
    output_db: &Path,
    tables: &[&TableSchema],
    options: StoreOptions,
    ui: &mut impl Ui,
) -> Result<IngestReport> {
    ui.set_phase(Phase::Preparing);
    let mut writer = SqliteWriter::create(output_db, options)?;
    writer.create_tables(ALL_TABLES)?;

    ui.set_phase(Phase::Loading);
    let mut outcomes = Vec::with_capacity(tables.len());
    for schema in tables {
        let outcome = match writer.import_table(schema, data_dir, ui) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(table = schema.name, error = %e, "Table skipped");
                ui.log(format!("Warning: {}. Skipping...", e));
                TableOutcome::Failed(e.to_string())
            }
        };
        outcomes.push((schema.name, outcome));
    }

    ui.set_phase(Phase::Verifying);
    let mut reports = Vec::with_capacity(ALL_TABLES.len());
    for schema in ALL_TABLES {
        let row_count = writer.count_rows(schema.name)?;
        ui.log(format!("  {}: {} rows", schema.name, row_count));

        let outcome = outcomes
            .iter()
            .find(|(name, _)| *name == schema.name)
            .map(|(_, o)| o.clone());
        reports.push(TableReport {
            table: schema.name,
            outcome,
            row_count,
        });
    }

    writer.close()?;
    ui.log(format!(
        "\nDatabase '{}' created successfully!",
        output_db.display()
    ));
    ui.set_phase(Phase::Complete);

    Ok(IngestReport {
        database: output_db.to_path_buf(),
        tables: reports,
    })
}
