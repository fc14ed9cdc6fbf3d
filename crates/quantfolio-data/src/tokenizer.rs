//! CSV line tokenizer.

/// Split one CSV line into trimmed fields.
///
/// A `"` toggles quoted mode and is dropped from the output; commas inside
/// quotes do not split. The last field is always emitted, so the result is
/// never empty. An unmatched quote simply leaves the rest of the line quoted.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
