//! Appending ranges to the ledger.

use super::lock::LedgerLock;
use crate::diagnostics::Diagnostics;
use crate::error::{PublishError, RangeError};
use crate::models::NetworkRange;
use crate::output::escape_csv_field;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub ledger_path: PathBuf,
    pub lines_written: usize,
}

fn validate(owner_id: &str, ranges: &[String]) -> Result<(), PublishError> {
    if owner_id.is_empty() || owner_id.contains(['\n', '\r']) {
        return Err(PublishError::InvalidOwner {
            owner: owner_id.to_string(),
            reason: "must be non-empty and on a single line".to_string(),
        });
    }
    for range in ranges {
        if range.contains([',', '"', '\n', '\r']) {
            return Err(PublishError::InvalidRange {
                range: range.clone(),
                source: RangeError::InvalidCidr {
                    cidr: range.clone(),
                    reason: "contains a CSV delimiter".to_string(),
                },
            });
        }
        NetworkRange::new(range).map_err(|source| PublishError::InvalidRange {
            range: range.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Append one `<owner_id>,<cidr>` line per range to the ledger.
///
/// Everything is checked before the lock is taken, so a bad range or a lock
/// timeout leaves the ledger untouched. Lines are written in order while the
/// lock is held; an I/O error part way through leaves the earlier lines in
/// place and reports how many made it. An unterminated last line left by an
/// earlier failed writer is cut off before appending. The lock is released
/// on every path.
pub fn publish_ranges(
    owner_id: &str,
    ranges: &[String],
    ledger_path: &Path,
    lock_timeout: Duration,
    diag: &dyn Diagnostics,
) -> Result<PublishOutcome, PublishError> {
    validate(owner_id, ranges)?;

    if let Some(dir) = ledger_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PublishError::DirectoryCreateError {
            dir: dir.to_path_buf(),
            source,
        })?;
    }

    if ranges.is_empty() {
        diag.warn("No IP ranges to publish.");
        return Ok(PublishOutcome {
            ledger_path: ledger_path.to_path_buf(),
            lines_written: 0,
        });
    }

    let lock = LedgerLock::acquire(ledger_path, lock_timeout).inspect_err(|e| {
        if let PublishError::LockTimeout { .. } = e {
            diag.warn(&e.to_string());
        }
    })?;
    diag.debug(&format!(
        "Holding {} for {} line(s)",
        lock.path().display(),
        ranges.len()
    ));
    let outcome = append_lines(owner_id, ranges, ledger_path, diag)?;
    drop(lock);

    diag.info(&format!(
        "IP ranges successfully saved to {}",
        ledger_path.display()
    ));
    Ok(outcome)
}

/// Cut the ledger back to just after its last `\n`.
///
/// Returns how many bytes were dropped.
fn trim_partial_line(file: &mut File) -> std::io::Result<u64> {
    let len = file.metadata()?.len();
    let mut keep = 0;
    let mut end = len;
    let mut buf = [0u8; 4096];
    while end > 0 {
        let start = end.saturating_sub(buf.len() as u64);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|&b| b == b'\n') {
            keep = start + pos as u64 + 1;
            break;
        }
        end = start;
    }
    if keep < len {
        file.set_len(keep)?;
    }
    Ok(len - keep)
}

fn append_lines(
    owner_id: &str,
    ranges: &[String],
    ledger_path: &Path,
    diag: &dyn Diagnostics,
) -> Result<PublishOutcome, PublishError> {
    let write_error = |lines_written: usize, source: std::io::Error| PublishError::WriteError {
        ledger_path: ledger_path.to_path_buf(),
        lines_written,
        source,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(ledger_path)
        .map_err(|e| write_error(0, e))?;

    let dropped = trim_partial_line(&mut file).map_err(|e| write_error(0, e))?;
    if dropped > 0 {
        diag.warn(&format!(
            "Dropped {} byte(s) of unterminated last line in {}",
            dropped,
            ledger_path.display()
        ));
    }

    let owner = escape_csv_field(owner_id);
    for (i, range) in ranges.iter().enumerate() {
        // one write per line keeps every line whole under O_APPEND
        let line = format!("{owner},{range}\n");
        file.write_all(line.as_bytes())
            .map_err(|e| write_error(i, e))?;
    }
    file.sync_data().map_err(|e| write_error(ranges.len(), e))?;

    Ok(PublishOutcome {
        ledger_path: ledger_path.to_path_buf(),
        lines_written: ranges.len(),
    })
}
