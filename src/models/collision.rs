//! Collision data model.

use super::{LedgerEntry, NetworkRange};
use serde::{Deserialize, Serialize};

/// Two ledger rows whose networks overlap.
///
/// Field order matches the report header
/// `network1,container1,network2,container2`; the first side is always the
/// row that appears earlier in the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CollisionRecord {
    pub network1: NetworkRange,
    #[serde(rename = "container1")]
    pub owner1: String,
    pub network2: NetworkRange,
    #[serde(rename = "container2")]
    pub owner2: String,
}

impl CollisionRecord {
    pub fn new(first: &LedgerEntry, second: &LedgerEntry) -> Self {
        CollisionRecord {
            network1: first.range,
            owner1: first.owner_id.clone(),
            network2: second.range,
            owner2: second.owner_id.clone(),
        }
    }
}
