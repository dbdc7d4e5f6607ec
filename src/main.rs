use clap::Parser;
use ip_range_ledger::cli::{Args, Mode};
use ip_range_ledger::config::Config;
use ip_range_ledger::diagnostics::{init_logging, Diagnostics, LogDiagnostics};
use ip_range_ledger::interfaces::SystemInterfaces;
use ip_range_ledger::output::{print_collisions, print_ranges};
use ip_range_ledger::{gather_ranges, run_audit, run_publish};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    init_logging()?;
    let args = Args::parse();
    log::info!("#Start main() {:?}", args.mode());

    let diag = LogDiagnostics;
    let config = Config::from_env().map_err(|e| {
        diag.error(&format!("Invalid configuration: {e}"));
        e
    })?;
    log::debug!("{:?}", config);

    match args.mode() {
        Mode::Publish { dry_run: true } => {
            let ranges = gather_ranges(&SystemInterfaces, &diag);
            print_ranges(&config.owner_id, &ranges);
        }
        Mode::Publish { dry_run: false } => {
            let outcome = run_publish(&config, &SystemInterfaces, &diag).map_err(|e| {
                diag.error(&format!("Error saving IP ranges to file: {e}"));
                e
            })?;
            log::info!(
                "Published {} range(s) to {}",
                outcome.lines_written,
                outcome.ledger_path.display()
            );
        }
        Mode::Audit { ledger, json } => {
            let records = run_audit(&config, &ledger, &diag).map_err(|e| {
                diag.error(&format!("Collision check of {} failed: {e}", ledger.display()));
                e
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_collisions(&records);
            }
        }
    }

    Ok(())
}
