//! The collision audit: ledger in, report out.

use crate::diagnostics::Diagnostics;
use crate::error::AuditError;
use crate::ledger::read_ledger;
use crate::models::CollisionRecord;
use crate::output::write_collision_report;
use crate::processing::{find_collisions, find_collisions_sorted};
use std::path::Path;

/// Audit the ledger at `ledger_path` for overlapping ranges.
///
/// A missing ledger is reported and yields an empty result. With no
/// collisions nothing is written; otherwise the full list is written to
/// `report_path` (replacing it) and returned. Ledgers with more than
/// `sweep_threshold` rows use the sweep-line detector.
pub fn detect_collisions(
    ledger_path: &Path,
    report_path: &Path,
    sweep_threshold: usize,
    diag: &dyn Diagnostics,
) -> Result<Vec<CollisionRecord>, AuditError> {
    let entries = match read_ledger(ledger_path) {
        Ok(entries) => entries,
        Err(AuditError::LedgerNotFound { path }) => {
            diag.warn(&format!("File not found: {}", path.display()));
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };
    diag.info(&format!(
        "Loaded {} ledger row(s) from {}",
        entries.len(),
        ledger_path.display()
    ));

    let collisions = if entries.len() > sweep_threshold {
        diag.debug(&format!(
            "Using sweep-line detection for {} rows",
            entries.len()
        ));
        find_collisions_sorted(&entries)
    } else {
        find_collisions(&entries)
    };

    if collisions.is_empty() {
        diag.info("No collisions detected.");
        return Ok(collisions);
    }

    diag.warn(&format!("Collisions found: {}", collisions.len()));
    for c in &collisions {
        diag.warn(&format!(
            "  {} ({}) overlaps {} ({})",
            c.network1, c.owner1, c.network2, c.owner2
        ));
    }

    write_collision_report(report_path, &collisions)?;
    diag.info(&format!("Collisions saved to {}", report_path.display()));
    Ok(collisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use log::Level;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_collisions_writes_report() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let report = dir.path().join("out").join("collisions.csv");
        fs::write(&ledger, "container1,192.168.1.0/24\ncontainer2,192.168.1.128/25\n").unwrap();
        let diag = MemoryDiagnostics::default();

        let result = detect_collisions(&ledger, &report, 512, &diag).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].owner1, "container1");
        assert_eq!(result[0].owner2, "container2");
        assert!(report.exists());
        assert!(diag.contains(Level::Info, "Collisions saved to"));
    }

    #[test]
    fn test_detect_collisions_none_writes_nothing() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let report = dir.path().join("collisions.csv");
        fs::write(&ledger, "c1,10.0.0.0/24\nc2,10.0.1.0/24\n").unwrap();
        let diag = MemoryDiagnostics::default();

        let result = detect_collisions(&ledger, &report, 512, &diag).unwrap();

        assert!(result.is_empty());
        assert!(!report.exists());
        assert!(diag.contains(Level::Info, "No collisions detected."));
    }

    #[test]
    fn test_detect_collisions_missing_ledger() {
        let dir = tempdir().unwrap();
        let diag = MemoryDiagnostics::default();
        let result = detect_collisions(
            &dir.path().join("missing.csv"),
            &dir.path().join("collisions.csv"),
            512,
            &diag,
        )
        .unwrap();
        assert!(result.is_empty());
        assert!(diag.contains(Level::Warn, "File not found"));
    }

    #[test]
    fn test_detect_collisions_bad_row_aborts() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let report = dir.path().join("collisions.csv");
        fs::write(&ledger, "c1,10.0.0.0/24\nc2,garbage\nc3,10.0.0.0/24\n").unwrap();
        let diag = MemoryDiagnostics::default();

        let err = detect_collisions(&ledger, &report, 512, &diag).unwrap_err();
        assert!(matches!(err, AuditError::ParseError { line: 2, .. }));
        assert!(!report.exists());
    }

    #[test]
    fn test_detect_collisions_sweep_path() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let report = dir.path().join("collisions.csv");
        fs::write(&ledger, "a,10.0.0.0/8\nb,10.20.0.0/16\nc,192.168.0.0/16\n").unwrap();
        let diag = MemoryDiagnostics::default();

        let naive = detect_collisions(&ledger, &report, 512, &diag).unwrap();
        assert!(!diag.contains(Level::Debug, "sweep-line"));
        let sweep = detect_collisions(&ledger, &report, 0, &diag).unwrap();
        assert!(diag.contains(Level::Debug, "sweep-line"));
        assert_eq!(naive, sweep);
        assert_eq!(sweep.len(), 1);
    }
}
