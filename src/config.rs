//! Runtime configuration read from the process environment.
//!
//! [`Config`] is built once at startup and passed by reference to each
//! entry point. File names embed the current date, computed once in the
//! configured timezone so every pod writing the same day hits the same file.

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

pub const FILE_EXTENSION: &str = ".csv";
pub const DEFAULT_LOCK_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_SWEEP_THRESHOLD: usize = 512;

pub const OWNER_VAR: &str = "POD_NAME";
pub const IP_RANGES_DIR_VAR: &str = "IP_RANGES_DIR_PATH";
pub const IP_RANGES_FILE_VAR: &str = "IP_RANGES_FILE_NAME";
pub const COLLISIONS_DIR_VAR: &str = "COLLISIONS_DIR_PATH";
pub const COLLISIONS_FILE_VAR: &str = "COLLISIONS_FILE_NAME";
pub const LOCK_TIMEOUT_VAR: &str = "IP_RANGES_LOCK_TIMEOUT";
pub const TIMEZONE_VAR: &str = "IP_RANGES_TIMEZONE";
pub const SWEEP_THRESHOLD_VAR: &str = "IP_RANGES_SWEEP_THRESHOLD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Identity written next to every published range.
    pub owner_id: String,
    pub ip_ranges_dir: PathBuf,
    pub ip_ranges_file_name: String,
    pub collisions_dir: PathBuf,
    pub collisions_file_name: String,
    /// Longest wait for the ledger lock before giving up.
    pub lock_timeout: Duration,
    pub timezone: Tz,
    /// Ledgers with more rows than this use the sweep-line detector.
    pub sweep_threshold: usize,
    /// `%Y-%m-%d` in `timezone`, fixed at construction.
    pub date: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok(), Utc::now())
    }

    /// Build configuration from any key lookup, at a given instant.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F, now: DateTime<Utc>) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let invalid = |var: &str, value: &str, reason: String| ConfigError {
            var: var.to_string(),
            value: value.to_string(),
            reason,
        };

        let timeout_raw = get(LOCK_TIMEOUT_VAR, &DEFAULT_LOCK_TIMEOUT_SECS.to_string());
        let lock_timeout = timeout_raw
            .trim()
            .parse::<f64>()
            .map_err(|e| e.to_string())
            .and_then(|secs| Duration::try_from_secs_f64(secs).map_err(|e| e.to_string()))
            .map_err(|reason| invalid(LOCK_TIMEOUT_VAR, &timeout_raw, reason))?;

        let tz_raw = get(TIMEZONE_VAR, "UTC");
        let timezone = tz_raw
            .trim()
            .parse::<Tz>()
            .map_err(|e| invalid(TIMEZONE_VAR, &tz_raw, e.to_string()))?;

        let sweep_raw = get(SWEEP_THRESHOLD_VAR, &DEFAULT_SWEEP_THRESHOLD.to_string());
        let sweep_threshold = sweep_raw
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(SWEEP_THRESHOLD_VAR, &sweep_raw, e.to_string()))?;

        Ok(Config {
            owner_id: get(OWNER_VAR, "POD_NAME"),
            ip_ranges_dir: PathBuf::from(get(IP_RANGES_DIR_VAR, "./")),
            ip_ranges_file_name: get(IP_RANGES_FILE_VAR, "ip-ranges"),
            collisions_dir: PathBuf::from(get(COLLISIONS_DIR_VAR, "./")),
            collisions_file_name: get(COLLISIONS_FILE_VAR, "collisions"),
            lock_timeout,
            timezone,
            sweep_threshold,
            date: now.with_timezone(&timezone).format("%Y-%m-%d").to_string(),
        })
    }

    /// Today's ledger, e.g. `./ip-ranges_2024-05-01.csv`.
    pub fn ledger_path(&self) -> PathBuf {
        self.ip_ranges_dir.join(format!(
            "{}_{}{}",
            self.ip_ranges_file_name, self.date, FILE_EXTENSION
        ))
    }

    /// Today's collision report, e.g. `./collisions_2024-05-01.csv`.
    pub fn report_path(&self) -> PathBuf {
        self.collisions_dir.join(format!(
            "{}_{}{}",
            self.collisions_file_name, self.date, FILE_EXTENSION
        ))
    }
}
