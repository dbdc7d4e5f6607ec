//! Netmask to prefix conversion.
//!
//! Turns the (address, dotted netmask) pairs reported for local interfaces
//! into `address/prefix` strings ready for the ledger.

use crate::diagnostics::Diagnostics;
use crate::error::RangeError;
use crate::models::InterfaceAddress;
use std::net::Ipv4Addr;

fn parse_octets(netmask: &str) -> Result<[u8; 4], RangeError> {
    let invalid = |reason: String| RangeError::InvalidNetmask {
        netmask: netmask.to_string(),
        reason,
    };

    let parts: Vec<&str> = netmask.split('.').collect();
    if parts.len() != 4 {
        return Err(invalid(format!("expected 4 octets, found {}", parts.len())));
    }

    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!("octet '{part}' is not numeric")));
        }
        *octet = part
            .parse()
            .map_err(|_| invalid(format!("octet '{part}' is outside 0-255")))?;
    }
    Ok(octets)
}

/// Convert a dotted-decimal netmask to a prefix length.
///
/// The prefix is the number of set bits, counted octet by octet. Set bits do
/// not have to be contiguous: `255.0.255.0` yields 16. Use
/// [`is_contiguous_netmask`] to tell such masks apart.
///
/// # Examples
/// ```
/// use ip_range_ledger::processing::netmask_to_prefix;
/// assert_eq!(netmask_to_prefix("255.255.255.0").unwrap(), 24);
/// ```
pub fn netmask_to_prefix(netmask: &str) -> Result<u8, RangeError> {
    let octets = parse_octets(netmask)?;
    Ok(octets.iter().map(|o| o.count_ones() as u8).sum())
}

/// True when `netmask` parses and its set bits form a high-order prefix.
pub fn is_contiguous_netmask(netmask: &str) -> bool {
    match parse_octets(netmask) {
        Ok(octets) => {
            let bits = u32::from_be_bytes(octets);
            bits.leading_ones() + bits.trailing_zeros() == 32
        }
        Err(_) => false,
    }
}

/// Combine an address with its netmask into `address/prefix`.
///
/// The address is kept as given; host bits are not cleared here.
pub fn to_cidr(addr: &str, netmask: &str) -> Result<String, RangeError> {
    let prefix = netmask_to_prefix(netmask)?;
    Ok(format!("{addr}/{prefix}"))
}

/// Normalize interface addresses into CIDR strings, in discovery order.
///
/// Entries with an empty address or netmask, non-IPv4 addresses and
/// malformed netmasks are skipped with a warning. Non-contiguous netmasks
/// are published with their popcount prefix, also with a warning.
pub fn collect_ranges(addresses: &[InterfaceAddress], diag: &dyn Diagnostics) -> Vec<String> {
    let mut ip_ranges = Vec::new();
    for a in addresses {
        if a.addr.is_empty() || a.netmask.is_empty() {
            diag.warn(&format!(
                "Skipping {}: missing address or netmask (addr={:?}, netmask={:?})",
                a.interface, a.addr, a.netmask
            ));
            continue;
        }
        if a.addr.parse::<Ipv4Addr>().is_err() {
            diag.warn(&format!(
                "Skipping {}: '{}' is not an IPv4 address",
                a.interface, a.addr
            ));
            continue;
        }
        match to_cidr(&a.addr, &a.netmask) {
            Ok(cidr) => {
                if !is_contiguous_netmask(&a.netmask) {
                    diag.warn(&format!(
                        "{}: netmask {} is not contiguous, publishing {} by bit count",
                        a.interface, a.netmask, cidr
                    ));
                }
                ip_ranges.push(cidr);
            }
            Err(e) => diag.warn(&format!("Skipping {}: {}", a.interface, e)),
        }
    }
    ip_ranges
}
