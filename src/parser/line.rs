const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one CSV line into fields.
///
/// Every `"` toggles quoted mode and is dropped; a doubled quote is not an
/// escape. Delimiters inside quotes are kept as text. The last field is always
/// emitted, so `a,b,` yields three fields.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
