//! The shared ledger file.
//!
//! - [`lock`] - cross-process advisory lock on a sibling `.lock` file
//! - [`publish`] - appending ranges under the lock
//! - [`read`] - loading and parsing rows for an audit

mod lock;
mod publish;
mod read;

pub use lock::{lock_path_for, LedgerLock, DEFAULT_POLL_INTERVAL};
pub use publish::{publish_ranges, PublishOutcome};
pub use read::{parse_ledger_line, read_ledger};
