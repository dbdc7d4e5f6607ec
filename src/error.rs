//! Error types for both pipelines.
//!
//! - [`RangeError`] - malformed netmask or CIDR text
//! - [`PublishError`] - failures while appending to the ledger
//! - [`AuditError`] - failures while reading the ledger or writing the report
//! - [`ConfigError`] - invalid environment configuration

use std::path::PathBuf;
use std::time::Duration;

/// Malformed netmask or CIDR input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid netmask '{netmask}': {reason}")]
    InvalidNetmask { netmask: String, reason: String },

    #[error("invalid CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("prefix length /{prefix} exceeds maximum /{max}")]
    InvalidPrefix { prefix: u8, max: u8 },
}

/// Errors from publishing ranges to the ledger.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("timed out after {timeout:?} waiting for lock {}", .lock_path.display())]
    LockTimeout { lock_path: PathBuf, timeout: Duration },

    #[error("cannot lock {}: {source}", .lock_path.display())]
    Lock {
        lock_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write to {} failed after {lines_written} line(s): {source}", .ledger_path.display())]
    WriteError {
        ledger_path: PathBuf,
        lines_written: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create directory {}: {source}", .dir.display())]
    DirectoryCreateError {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid owner id {owner:?}: {reason}")]
    InvalidOwner { owner: String, reason: String },

    #[error("refusing to publish range {range:?}: {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: RangeError,
    },
}

/// Errors from auditing the ledger.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("ledger file not found: {}", .path.display())]
    LedgerNotFound { path: PathBuf },

    #[error("cannot read ledger {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    ParseError {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("cannot write collision report {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create directory {}: {source}", .dir.display())]
    DirectoryCreateError {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid value in the process environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: String,
    pub value: String,
    pub reason: String,
}
