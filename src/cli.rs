//! Command line surface.
//!
//! With no arguments the tool publishes. `audit <LEDGER>` (or the older
//! `--check-collision <LEDGER>`) audits a ledger instead.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Publish local IPv4 ranges to a shared ledger, or audit a ledger for overlaps
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File path to check for IP collisions
    #[arg(long, value_name = "LEDGER")]
    pub check_collision: Option<PathBuf>,

    /// Print collisions as JSON (with --check-collision)
    #[arg(long, requires = "check_collision")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append this host's IPv4 ranges to today's ledger (default)
    Publish {
        /// Print the ranges instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Check a ledger file for overlapping ranges
    Audit {
        ledger: PathBuf,
        /// Print collisions as JSON
        #[arg(long)]
        json: bool,
    },
}

/// The operation selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Publish { dry_run: bool },
    Audit { ledger: PathBuf, json: bool },
}

impl Args {
    pub fn mode(&self) -> Mode {
        match (&self.command, &self.check_collision) {
            (Some(Command::Publish { dry_run }), _) => Mode::Publish { dry_run: *dry_run },
            (Some(Command::Audit { ledger, json }), _) => Mode::Audit {
                ledger: ledger.clone(),
                json: *json,
            },
            (None, Some(ledger)) => Mode::Audit {
                ledger: ledger.clone(),
                json: self.json,
            },
            (None, None) => Mode::Publish { dry_run: false },
        }
    }
}
