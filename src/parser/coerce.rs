use once_cell::sync::Lazy;
use regex::Regex;

use super::record::SqlValue;

/// Longest leading number, the way JavaScript's `parseFloat` reads one
static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("numeric prefix pattern is valid")
});

/// Column-name fragments that mark a column as numeric.
///
/// This is a name heuristic, not schema knowledge: a text column whose name
/// happens to contain one of these is also tried as a number.
pub const NUMERIC_NAME_HINTS: &[&str] = &["_id", "price", "quantity", "cost", "amount", "subtotal"];

/// Whether values of this column should be tried as numbers (case-sensitive)
pub fn is_numeric_column(column: &str) -> bool {
    NUMERIC_NAME_HINTS.iter().any(|hint| column.contains(hint))
}

/// Parse the numeric prefix of `text`, ignoring whatever follows it.
///
/// `"3 pcs"` reads as 3 and `"1e"` as 1. Only the spelled-out `Infinity` is
/// infinite; `inf` and `NaN` are not numbers.
pub fn parse_number_prefix(text: &str) -> Option<f64> {
    let prefix = NUMBER_PREFIX.find(text)?.as_str();
    let unsigned = prefix.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" {
        let inf = f64::INFINITY;
        return Some(if prefix.starts_with('-') { -inf } else { inf });
    }
    prefix.parse::<f64>().ok()
}

/// Convert a decoded value to a number when its column name suggests one.
///
/// Values without a numeric prefix are returned unchanged.
pub fn coerce_value(column: &str, value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(text) if is_numeric_column(column) => match parse_number_prefix(&text) {
            Some(n) => SqlValue::Real(n),
            None => SqlValue::Text(text),
        },
        other => other,
    }
}
