//! Terminal output.
//!
//! Prints audit results and discovered ranges as aligned, quoted columns.

use crate::models::CollisionRecord;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// Values longer than `width` are never truncated.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

fn collision_row(i: usize, r: &CollisionRecord) -> String {
    format!(
        "{cnt},{network1},{container1},{network2},{container2}",
        cnt = format_field(i + 1, 5),
        network1 = format_field(r.network1, 20),
        container1 = format_field(&r.owner1, 24),
        network2 = format_field(r.network2, 20),
        container2 = format_field(&r.owner2, 24),
    )
}

/// Print collisions as a table on stdout, or a single line if there are none.
pub fn print_collisions(records: &[CollisionRecord]) {
    if records.is_empty() {
        println!("{}", "No collisions detected.".green());
        return;
    }

    println!(
        "{}",
        format!(
            "{},{},{},{},{}",
            format_field("cnt", 5),
            format_field("network1", 20),
            format_field("container1", 24),
            format_field("network2", 20),
            format_field("container2", 24),
        )
        .bold()
    );
    for (i, r) in records.iter().enumerate() {
        println!("{}", collision_row(i, r));
    }
    println!(
        "#{}# {} collision(s) found",
        "WARN".on_red(),
        records.len()
    );
}

/// Print ranges that would be published, one per line.
pub fn print_ranges(owner_id: &str, ranges: &[String]) {
    if ranges.is_empty() {
        println!("{}", "No IPv4 ranges found.".yellow());
        return;
    }
    for range in ranges {
        println!("{},{}", format_field(owner_id, 24), format_field(range, 20));
    }
}
