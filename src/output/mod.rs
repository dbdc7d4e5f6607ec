//! Output formatting for ledger rows and collision reports.
//!
//! This module handles CSV text in both directions and terminal output:
//! - [`csv`] - CSV field escaping, row splitting and the collision report
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{escape_csv_field, split_csv_row, write_collision_report, REPORT_HEADER};
pub use terminal::{format_field, print_collisions, print_ranges};
