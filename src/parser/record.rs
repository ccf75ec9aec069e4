use std::fmt;

use super::coerce::coerce_value;
use super::line::tokenize_line;

/// Token that stands for a missing value in the source files
pub const NULL_TOKEN: &str = "NULL";

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "null"),
            SqlValue::Real(n) => write!(f, "{}", n),
            SqlValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// A decoded data line, aligned with the header of its file
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// 1-based line number in the source file
    pub line: usize,
    pub values: Vec<SqlValue>,
}

impl ParsedRow {
    /// Render the row as `{col: value, ...}` for error messages
    pub fn describe(&self, columns: &[String]) -> String {
        let pairs: Vec<String> = columns
            .iter()
            .zip(&self.values)
            .map(|(col, value)| format!("{}: {}", col, value))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

/// A whole CSV file: header columns plus decoded rows
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse file content into a header and decoded, coerced rows.
///
/// The first non-blank line is the header. Whitespace-only lines are skipped.
/// A leading byte-order mark is dropped.
pub fn parse_csv(content: &str) -> CsvTable {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let body = content.trim();
    let leading = content.len() - content.trim_start().len();
    let first_line = content[..leading].matches('\n').count() + 1;

    let mut lines = body.lines().enumerate();
    let columns: Vec<String> = match lines.next() {
        Some((_, header)) => tokenize_line(header)
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return CsvTable::default(),
    };

    let rows = lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let line_no = first_line + idx;
            let fields = tokenize_line(line);
            if fields.len() != columns.len() {
                tracing::debug!(
                    line = line_no,
                    expected = columns.len(),
                    found = fields.len(),
                    "Field count does not match header"
                );
            }
            let values = decode_row(&columns, &fields)
                .into_iter()
                .zip(&columns)
                .map(|(value, col)| coerce_value(col, value))
                .collect();
            ParsedRow {
                line: line_no,
                values,
            }
        })
        .collect();

    CsvTable { columns, rows }
}

/// Align data fields with the header. Missing trailing fields are null, extra
/// fields are dropped.
pub fn decode_row(columns: &[String], fields: &[String]) -> Vec<SqlValue> {
    (0..columns.len())
        .map(|idx| {
            fields
                .get(idx)
                .map(|f| normalize_field(f))
                .unwrap_or(SqlValue::Null)
        })
        .collect()
}

/// Trim a raw field; empty and `NULL` become null
fn normalize_field(raw: &str) -> SqlValue {
    let value = raw.trim();
    if value.is_empty() || value == NULL_TOKEN {
        SqlValue::Null
    } else {
        SqlValue::Text(value.to_string())
    }
}
