//! Range processing logic.
//!
//! This module contains the pure logic of both pipelines:
//! - [`netmask`] - Netmask to prefix conversion and CIDR normalization
//! - [`collisions`] - Pairwise overlap detection over ledger entries

mod collisions;
mod netmask;

// Re-export public functions
pub use collisions::{find_collisions, find_collisions_sorted};
pub use netmask::{collect_ranges, is_contiguous_netmask, netmask_to_prefix, to_cidr};
