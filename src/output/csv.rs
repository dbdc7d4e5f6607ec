//! CSV text for the ledger and the collision report.

use crate::error::AuditError;
use crate::models::CollisionRecord;
use std::fs;
use std::path::Path;

/// Header row of the collision report.
pub const REPORT_HEADER: &str = "network1,container1,network2,container2";

/// Quote a field if it contains a comma, quote or line break.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        // enclose in double quotes and double any quotes within the field
        let escaped = input.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        input.to_string()
    }
}

/// Split one CSV row into fields, honouring double-quoted fields.
///
/// Inside quotes a doubled quote is a literal `"`. An unterminated quote is
/// an error.
pub fn split_csv_row(row: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field: {row:?}"));
    }
    fields.push(field);
    Ok(fields)
}

/// Write the collision report, replacing any previous file at `path`.
pub fn write_collision_report(path: &Path, records: &[CollisionRecord]) -> Result<(), AuditError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| AuditError::DirectoryCreateError {
            dir: dir.to_path_buf(),
            source,
        })?;
    }

    let mut out = String::with_capacity(64 * (records.len() + 1));
    out.push_str(REPORT_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{network1},{container1},{network2},{container2}\n",
            network1 = r.network1,
            container1 = escape_csv_field(&r.owner1),
            network2 = r.network2,
            container2 = escape_csv_field(&r.owner2),
        ));
    }

    fs::write(path, out).map_err(|source| AuditError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}
