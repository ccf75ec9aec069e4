//! Analytics report over a finished store
//!
//! Runs every query in [`ALL_QUERIES`], prints each result set as a table
//! followed by its JSON block, and writes the same JSON report to a file.

pub mod queries;

pub use queries::*;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::path::Path;

use crate::ui::{Phase, Ui};

const RULE_WIDTH: usize = 80;
const REPORT_TITLE: &str = "E-COMMERCE ANALYTICS REPORT - MULTI-TABLE JOIN QUERY";

/// Rows returned by one report query
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query: &'static ReportQuery,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// Run a single query, turning each row into a JSON object keyed by column name
pub fn run_query(conn: &Connection, query: &'static ReportQuery) -> Result<QueryResult> {
    let mut stmt = conn
        .prepare(query.sql)
        .with_context(|| format!("Failed to prepare query: {}", query.title))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut result_rows = stmt.query([])?;
    while let Some(row) = result_rows.next()? {
        let mut object = Map::new();
        for (idx, name) in columns.iter().enumerate() {
            object.insert(name.clone(), to_json(row.get_ref(idx)?));
        }
        rows.push(object);
    }

    Ok(QueryResult {
        query,
        columns,
        rows,
    })
}

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Whole-number reals serialize without a fraction (`1999`, not `1999.0`)
fn real_to_json(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
        return Value::from(f as i64);
    }
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => real_to_json(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{:02x}", b)).collect()),
    }
}

/// Open the store read-only and run every report query
pub fn run_all(db_path: &Path) -> Result<Vec<QueryResult>> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;

    ALL_QUERIES
        .iter()
        .copied()
        .map(|query| run_query(&conn, query))
        .collect()
}

/// Run the report: results go to the UI as tables plus the JSON report text,
/// and the JSON report is written to `output`
pub fn run_report(db_path: &Path, output: &Path, ui: &mut impl Ui) -> Result<Vec<QueryResult>> {
    ui.set_phase(Phase::Reporting);
    let results = run_all(db_path)?;

    let mut text = report_header();
    ui.log(text.clone());

    for (idx, result) in results.iter().enumerate() {
        ui.log(format!("\nQUERY {}: {}", idx + 1, result.query.title));
        ui.log("-".repeat(RULE_WIDTH));
        ui.log(render_table(result).to_string());

        let section = report_section(idx, result)?;
        ui.log(section.clone());
        text.push_str(&section);
    }

    let footer = report_footer();
    ui.log(footer.clone());
    text.push_str(&footer);

    std::fs::write(output, text)
        .with_context(|| format!("Failed to write report to {:?}", output))?;
    ui.log(format!("\nOutput saved to {}", output.display()));
    ui.set_phase(Phase::Complete);

    Ok(results)
}

/// Render one result set as a console table
pub fn render_table(result: &QueryResult) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(result.columns.iter().map(Cell::new));

    for row in &result.rows {
        table.add_row(result.columns.iter().map(|col| match row.get(col) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "NULL".to_string(),
            Some(v) => v.to_string(),
        }));
    }

    table
}

fn report_header() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{REPORT_TITLE}\n{rule}\n\n\n")
}

/// One "QUERY n RESULTS:" block: pretty JSON rows and the summary line
fn report_section(idx: usize, result: &QueryResult) -> Result<String> {
    let mut out = String::new();
    let json = serde_json::to_string_pretty(&result.rows)?;
    writeln!(out, "\nQUERY {} RESULTS:", idx + 1)?;
    writeln!(out, "{}", json)?;
    writeln!(out, "\n{}\n", result.query.footer_for(result.rows.len()))?;
    Ok(out)
}

fn report_footer() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nEND OF REPORT\n{rule}\n")
}
