//! Overlapping network detection.
//!
//! Finds every unordered pair of ledger rows whose networks share at least
//! one address. Rows are never paired with themselves, and each pair is
//! reported once with the earlier ledger row first.

use crate::models::{CollisionRecord, LedgerEntry};
use itertools::Itertools;

/// Compare every pair of entries, O(n²).
///
/// Pairs come out in ledger order: `(0, 1), (0, 2), .., (1, 2), ..`.
pub fn find_collisions(entries: &[LedgerEntry]) -> Vec<CollisionRecord> {
    entries
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a.range.overlaps(&b.range))
        .map(|(a, b)| CollisionRecord::new(a, b))
        .collect()
}

/// Sweep-line variant of [`find_collisions`] with the same output.
///
/// Entries are sorted by family and first address; each entry is then only
/// compared with the still-open ranges before it. Cost is O(n log n) for the
/// sort plus the number of overlapping pairs, instead of O(n²).
pub fn find_collisions_sorted(entries: &[LedgerEntry]) -> Vec<CollisionRecord> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&i| {
        let (lo, _) = entries[i].range.bounds();
        (!entries[i].range.is_ipv4(), lo, i)
    });

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    // (index, family is ipv4, last address) of ranges not yet passed
    let mut active: Vec<(usize, bool, u128)> = Vec::new();

    for &i in &order {
        let range = &entries[i].range;
        let (lo, hi) = range.bounds();
        let is_ipv4 = range.is_ipv4();

        active.retain(|&(_, active_v4, active_hi)| active_v4 == is_ipv4 && active_hi >= lo);
        // every remaining range starts at or before `lo` and ends at or after it
        pairs.extend(active.iter().map(|&(j, _, _)| (j.min(i), j.max(i))));
        active.push((i, is_ipv4, hi));
    }

    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(i, j)| CollisionRecord::new(&entries[i], &entries[j]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NetworkRange;

    fn entries(rows: &[(&str, &str)]) -> Vec<LedgerEntry> {
        rows.iter()
            .enumerate()
            .map(|(i, (owner, cidr))| {
                LedgerEntry::new(
                    owner,
                    NetworkRange::new(cidr).unwrap(),
                    &format!("{owner},{cidr}"),
                    i + 1,
                )
            })
            .collect()
    }

    #[test]
    fn test_subnet_containment_is_a_collision() {
        let data = entries(&[
            ("container1", "192.168.1.0/24"),
            ("container2", "192.168.1.128/25"),
        ]);
        let result = find_collisions(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].owner1, "container1");
        assert_eq!(result[0].owner2, "container2");
        assert_eq!(result[0].network1.to_string(), "192.168.1.0/24");
        assert_eq!(result[0].network2.to_string(), "192.168.1.128/25");
    }

    #[test]
    fn test_disjoint_ranges() {
        let data = entries(&[("c1", "10.0.0.0/24"), ("c2", "10.0.1.0/24")]);
        assert!(find_collisions(&data).is_empty());
        assert!(find_collisions_sorted(&data).is_empty());
    }

    #[test]
    fn test_no_self_pairing() {
        let data = entries(&[("c1", "10.0.0.0/24")]);
        assert!(find_collisions(&data).is_empty());
        assert!(find_collisions(&[]).is_empty());
        assert!(find_collisions_sorted(&[]).is_empty());
    }

    #[test]
    fn test_same_network_twice_collides() {
        let data = entries(&[("podA", "10.0.0.5/24"), ("podB", "10.0.0.9/24")]);
        let result = find_collisions(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].network1, result[0].network2);
    }

    #[test]
    fn test_same_owner_still_reported() {
        let data = entries(&[("podA", "10.0.0.0/16"), ("podA", "10.0.3.0/24")]);
        assert_eq!(find_collisions(&data).len(), 1);
    }

    #[test]
    fn test_pairs_in_ledger_order() {
        let data = entries(&[
            ("a", "10.0.0.0/8"),
            ("b", "192.168.0.0/16"),
            ("c", "10.1.0.0/16"),
            ("d", "10.1.2.0/24"),
        ]);
        let result = find_collisions(&data);
        let owners: Vec<(&str, &str)> = result
            .iter()
            .map(|c| (c.owner1.as_str(), c.owner2.as_str()))
            .collect();
        assert_eq!(owners, vec![("a", "c"), ("a", "d"), ("c", "d")]);
    }

    #[test]
    fn test_mixed_families_do_not_collide() {
        let data = entries(&[("v4", "0.0.0.0/0"), ("v6", "::/0"), ("v6b", "fd00::/8")]);
        let result = find_collisions(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].owner1, "v6");
        assert_eq!(result[0].owner2, "v6b");
    }

    fn mixed_ledger() -> Vec<LedgerEntry> {
        entries(&[
            ("a", "10.0.0.0/8"),
            ("b", "192.168.0.0/16"),
            ("c", "10.1.0.0/16"),
            ("d", "192.168.5.0/24"),
            ("e", "10.1.2.3/32"),
            ("f", "172.16.0.0/12"),
            ("g", "10.1.0.0/16"),
            ("h", "fd00::/8"),
            ("i", "fd00:1::/32"),
            ("j", "0.0.0.0/0"),
            ("k", "255.255.255.255/32"),
            ("l", "10.2.0.0/16"),
        ])
    }

    #[test]
    fn test_sorted_matches_naive() {
        let data = mixed_ledger();
        let naive = find_collisions(&data);
        let sorted = find_collisions_sorted(&data);
        assert_eq!(naive, sorted);
        assert!(!naive.is_empty());
    }

    #[test]
    fn test_sorted_matches_naive_generated() {
        // deterministic spread of /16../28 networks inside 10.0.0.0/12
        let mut rows = Vec::new();
        let mut seed: u32 = 7;
        for i in 0..300 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let addr = 0x0A00_0000 | (seed >> 12);
            let prefix = 16 + (seed % 13);
            let ip = std::net::Ipv4Addr::from(addr);
            rows.push((format!("pod{i}"), format!("{ip}/{prefix}")));
        }
        let borrowed: Vec<(&str, &str)> = rows
            .iter()
            .map(|(o, c)| (o.as_str(), c.as_str()))
            .collect();
        let data = entries(&borrowed);
        assert_eq!(find_collisions(&data), find_collisions_sorted(&data));
    }

    #[test]
    fn test_symmetry() {
        let data = mixed_ledger();
        for a in &data {
            for b in &data {
                assert_eq!(
                    a.range.overlaps(&b.range),
                    b.range.overlaps(&a.range),
                    "{} vs {}",
                    a.range,
                    b.range
                );
            }
        }

        let mut reversed = data.clone();
        reversed.reverse();
        let pairs = |found: Vec<CollisionRecord>| {
            let mut owners: Vec<(String, String)> = found
                .into_iter()
                .map(|c| {
                    let (x, y) = (c.owner1, c.owner2);
                    if x < y { (x, y) } else { (y, x) }
                })
                .collect();
            owners.sort();
            owners
        };
        assert_eq!(pairs(find_collisions(&data)), pairs(find_collisions(&reversed)));
    }
}
