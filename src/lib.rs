// cargo watch -x 'fmt' -x 'test'

pub mod audit;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interfaces;
pub mod ledger;
pub mod models;
pub mod output;
pub mod processing;

use config::Config;
use diagnostics::Diagnostics;
use error::{AuditError, PublishError};
use interfaces::InterfaceSource;
use ledger::PublishOutcome;
use models::CollisionRecord;
use std::path::Path;

pub use audit::detect_collisions;
pub use ledger::publish_ranges;
pub use processing::netmask_to_prefix;

/// Read local interface addresses and normalize them into CIDR strings.
pub fn gather_ranges(source: &dyn InterfaceSource, diag: &dyn Diagnostics) -> Vec<String> {
    let addresses = source.addresses();
    diag.debug(&format!("Interface addresses: {:?}", addresses));
    processing::collect_ranges(&addresses, diag)
}

/// Publish this host's ranges to today's ledger under `config.owner_id`.
pub fn run_publish(
    config: &Config,
    source: &dyn InterfaceSource,
    diag: &dyn Diagnostics,
) -> Result<PublishOutcome, PublishError> {
    diag.info("Gathering IP ranges.");
    let ranges = gather_ranges(source, diag);
    diag.info(&format!(
        "Got the following IPs: {:?}. Saving to file...",
        ranges
    ));
    publish_ranges(
        &config.owner_id,
        &ranges,
        &config.ledger_path(),
        config.lock_timeout,
        diag,
    )
}

/// Audit `ledger_path`, writing any collisions to today's report.
pub fn run_audit(
    config: &Config,
    ledger_path: &Path,
    diag: &dyn Diagnostics,
) -> Result<Vec<CollisionRecord>, AuditError> {
    diag.info(&format!(
        "Checking collisions for file: {}",
        ledger_path.display()
    ));
    detect_collisions(
        ledger_path,
        &config.report_path(),
        config.sweep_threshold,
        diag,
    )
}
