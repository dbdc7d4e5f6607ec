//! Loading the ledger for an audit.

use crate::error::AuditError;
use crate::models::{LedgerEntry, NetworkRange};
use crate::output::split_csv_row;
use std::io::ErrorKind;
use std::path::Path;

/// Parse one ledger row, `owner_id,cidr`.
///
/// Returns the reason on failure; `line_no` is only recorded in the entry.
pub fn parse_ledger_line(line: &str, line_no: usize) -> Result<LedgerEntry, String> {
    let fields = split_csv_row(line)?;
    if fields.len() != 2 {
        return Err(format!("expected 2 columns, found {}: {line:?}", fields.len()));
    }
    let owner_id = &fields[0];
    if owner_id.trim().is_empty() {
        return Err(format!("empty owner id: {line:?}"));
    }
    let range = NetworkRange::new(&fields[1]).map_err(|e| e.to_string())?;
    Ok(LedgerEntry::new(owner_id, range, line, line_no))
}

/// Read every row of the ledger at `path`, in file order.
///
/// Blank lines are skipped. The first malformed row aborts the read with
/// [`AuditError::ParseError`]; a missing file is [`AuditError::LedgerNotFound`].
pub fn read_ledger(path: &Path) -> Result<Vec<LedgerEntry>, AuditError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AuditError::LedgerNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(AuditError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_ledger_line(line, i + 1).map_err(|reason| AuditError::ParseError {
                path: path.to_path_buf(),
                line: i + 1,
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_ledger_line() {
        let entry = parse_ledger_line("podA,192.168.1.1/24", 4).unwrap();
        assert_eq!(entry.owner_id, "podA");
        assert_eq!(entry.range.to_string(), "192.168.1.0/24");
        assert_eq!(entry.raw_line, "podA,192.168.1.1/24");
        assert_eq!(entry.line_no, 4);
    }

    #[test]
    fn test_parse_ledger_line_quoted_owner() {
        let entry = parse_ledger_line("\"ns,pod\",10.0.0.1/16", 1).unwrap();
        assert_eq!(entry.owner_id, "ns,pod");
    }

    #[test]
    fn test_parse_ledger_line_rejects() {
        assert!(parse_ledger_line("podA", 1).is_err());
        assert!(parse_ledger_line("podA,10.0.0.0/24,extra", 1).is_err());
        assert!(parse_ledger_line(",10.0.0.0/24", 1).is_err());
        assert!(parse_ledger_line("podA,10.0.0.0/33", 1).is_err());
        assert!(parse_ledger_line("podA,not-a-network", 1).is_err());
        assert!(parse_ledger_line("\"podA,10.0.0.0/24", 1).is_err());
    }

    #[test]
    fn test_read_ledger() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        fs::write(&path, "podA,10.0.0.1/16\n\npodB,fd00::1/64\r\npodA,192.168.1.1/24").unwrap();
        let entries = read_ledger(&path).unwrap();
        let owners: Vec<&str> = entries.iter().map(|e| e.owner_id.as_str()).collect();
        assert_eq!(owners, vec!["podA", "podB", "podA"]);
        assert_eq!(entries[1].range.to_string(), "fd00::/64");
        assert_eq!(entries[2].line_no, 4);
    }

    #[test]
    fn test_read_ledger_missing() {
        let dir = tempdir().unwrap();
        let err = read_ledger(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, AuditError::LedgerNotFound { .. }));
    }

    #[test]
    fn test_read_ledger_aborts_on_bad_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        fs::write(&path, "podA,10.0.0.1/16\npodB,10.0.0.300/16\npodC,10.1.0.0/16\n").unwrap();
        match read_ledger(&path).unwrap_err() {
            AuditError::ParseError { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("10.0.0.300"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
