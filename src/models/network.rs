//! IP network ranges in CIDR notation.
//!
//! Provides [`NetworkRange`] for IPv4 and IPv6 networks, along with the
//! bit-level helpers used for masking and overlap checks. Both families are
//! handled as right-aligned `u128` values so one code path serves both.

use crate::error::RangeError;
use crate::processing::{is_contiguous_netmask, netmask_to_prefix};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Maximum prefix length for an IPv4 network (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for an IPv6 network (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Number of address bits in the family of `addr`.
pub fn max_length(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => MAX_LENGTH_V4,
        IpAddr::V6(_) => MAX_LENGTH_V6,
    }
}

fn all_bits(width: u8) -> u128 {
    if width >= MAX_LENGTH_V6 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

fn host_mask(len: u8, width: u8) -> u128 {
    all_bits(width).checked_shr(u32::from(len)).unwrap_or(0)
}

fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn addr_from_bits(bits: u128, family: IpAddr) -> IpAddr {
    match family {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::from((bits & all_bits(MAX_LENGTH_V4)) as u32)),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Convert a prefix length to a netmask of `width` bits, right-aligned in a `u128`.
///
/// # Examples
/// ```
/// use ip_range_ledger::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24, 32).unwrap(), 0xFFFF_FF00);
/// ```
pub fn get_cidr_mask(len: u8, width: u8) -> Result<u128, RangeError> {
    if len > width {
        return Err(RangeError::InvalidPrefix {
            prefix: len,
            max: width,
        });
    }
    Ok(all_bits(width) & !host_mask(len, width))
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: IpAddr, len: u8) -> Result<IpAddr, RangeError> {
    let mask = get_cidr_mask(len, max_length(addr))?;
    Ok(addr_from_bits(addr_bits(addr) & mask, addr))
}

/// Calculate the broadcast (last) address for a given IP and prefix length.
pub fn broadcast_addr(addr: IpAddr, len: u8) -> Result<IpAddr, RangeError> {
    let width = max_length(addr);
    let mask = get_cidr_mask(len, width)?;
    let network_bits = addr_bits(addr) & mask;
    Ok(addr_from_bits(network_bits | host_mask(len, width), addr))
}

/// An IP network: a network address plus a prefix length.
///
/// The address never carries host bits; [`NetworkRange::new`] masks them off,
/// so `10.0.0.5/24` and `10.0.0.0/24` are the same range. Ordering is by
/// family (IPv4 first), then network address, then prefix length.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct NetworkRange {
    addr: IpAddr,
    prefix: u8,
}

impl NetworkRange {
    /// Parse a CIDR string such as `"10.0.0.0/24"` or `"fd00::/64"`.
    ///
    /// Host bits are masked off rather than rejected. A bare address is a
    /// host route (`/32` or `/128`). IPv4 also accepts a dotted netmask in
    /// place of the prefix length, provided the mask is contiguous.
    pub fn new(cidr: &str) -> Result<NetworkRange, RangeError> {
        let cidr = cidr.trim();
        let invalid = |reason: String| RangeError::InvalidCidr {
            cidr: cidr.to_string(),
            reason,
        };

        let (addr_part, prefix_part) = match cidr.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (cidr, None),
        };
        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| invalid(format!("invalid address '{addr_part}'")))?;

        let prefix = match prefix_part {
            None => max_length(addr),
            Some(p) if addr.is_ipv4() && p.contains('.') => {
                if !is_contiguous_netmask(p) {
                    return Err(invalid(format!("netmask '{p}' is not a contiguous prefix")));
                }
                netmask_to_prefix(p)?
            }
            Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => p
                .parse::<u8>()
                .map_err(|_| invalid(format!("prefix '{p}' is out of range")))?,
            Some(p) => return Err(invalid(format!("invalid prefix '{p}'"))),
        };

        Self::from_parts(addr, prefix)
    }

    /// Build a range from an address and prefix length, masking host bits.
    pub fn from_parts(addr: IpAddr, prefix: u8) -> Result<NetworkRange, RangeError> {
        let addr = cut_addr(addr, prefix)?;
        Ok(NetworkRange { addr, prefix })
    }

    /// The network (lowest) address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The prefix length.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    /// Get the lowest (network) address in the range.
    pub fn lo(&self) -> IpAddr {
        self.addr
    }

    /// Get the highest (broadcast) address in the range.
    pub fn hi(&self) -> IpAddr {
        let (_, hi) = self.bounds();
        addr_from_bits(hi, self.addr)
    }

    /// First and last address as right-aligned integers.
    pub(crate) fn bounds(&self) -> (u128, u128) {
        let lo = addr_bits(self.addr);
        (lo, lo | host_mask(self.prefix, max_length(self.addr)))
    }

    /// True when the two ranges share at least one address.
    ///
    /// Containment counts as overlap. Ranges of different families never
    /// overlap.
    pub fn overlaps(&self, other: &NetworkRange) -> bool {
        if self.is_ipv4() != other.is_ipv4() {
            return false;
        }
        let (lo, hi) = self.bounds();
        let (other_lo, other_hi) = other.bounds();
        lo <= other_hi && other_lo <= hi
    }
}

impl std::str::FromStr for NetworkRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkRange::new(s)
    }
}

impl std::fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl Serialize for NetworkRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkRange {
    fn deserialize<D>(deserializer: D) -> Result<NetworkRange, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NetworkRange::new(&s).map_err(de::Error::custom)
    }
}
