//! Ledger row data model.

use super::NetworkRange;

/// One row of the shared ledger: an owner and the range it reported.
///
/// The same owner may appear on many rows, one per interface and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Pod or container identifier that published the range.
    pub owner_id: String,
    /// Parsed network, host bits masked off.
    pub range: NetworkRange,
    /// The row exactly as read, without the line terminator.
    pub raw_line: String,
    /// 1-based line number in the ledger file.
    pub line_no: usize,
}

impl LedgerEntry {
    pub fn new(owner_id: &str, range: NetworkRange, raw_line: &str, line_no: usize) -> Self {
        LedgerEntry {
            owner_id: owner_id.to_string(),
            range,
            raw_line: raw_line.to_string(),
            line_no,
        }
    }
}
