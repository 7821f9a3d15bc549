//! Minimal tabular codec for the catalog files.
//!
//! The catalog files are ordinary comma-separated text with a header row.
//! Quoting follows RFC 4180: a field containing a comma, double quote, or
//! line break is wrapped in double quotes with embedded quotes doubled, so
//! files written by other tooling keep round-tripping.

/// Split a file into records of fields. Handles quoted fields, doubled
/// quotes, and line breaks inside quotes. Empty trailing lines produce no
/// record.
pub fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut saw_any = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                saw_any = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                saw_any = true;
            }
            '\r' => {
                // swallow; the following \n ends the record
            }
            '\n' => {
                if saw_any || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                saw_any = false;
            }
            _ => {
                field.push(c);
                saw_any = true;
            }
        }
    }
    if saw_any || !field.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// Render one record as a line (no trailing newline), quoting as needed.
pub fn render_record(fields: &[String]) -> String {
    let rendered: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    rendered.join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
