//! Domain models for the IP range ledger.
//!
//! This module contains the core data structures shared by both pipelines:
//! - [`NetworkRange`] - IPv4/IPv6 network in CIDR notation
//! - [`LedgerEntry`] - one parsed ledger row
//! - [`CollisionRecord`] - a pair of ledger rows whose networks overlap
//! - [`InterfaceAddress`] - an (address, netmask) pair reported by the OS

mod collision;
mod interface;
mod ledger_entry;
mod network;

// Re-export public types
pub use collision::CollisionRecord;
pub use interface::InterfaceAddress;
pub use ledger_entry::LedgerEntry;
pub use network::{
    broadcast_addr, cut_addr, get_cidr_mask, max_length, NetworkRange, MAX_LENGTH_V4,
    MAX_LENGTH_V6,
};
