//! Raw interface address data model.

/// An IPv4 address and dotted netmask as reported for one interface.
///
/// Both fields are kept as text; validation happens when the pair is
/// normalized into a CIDR string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// Interface name, e.g. `eth0`.
    pub interface: String,
    pub addr: String,
    pub netmask: String,
}

impl InterfaceAddress {
    pub fn new(interface: &str, addr: &str, netmask: &str) -> Self {
        InterfaceAddress {
            interface: interface.to_string(),
            addr: addr.to_string(),
            netmask: netmask.to_string(),
        }
    }
}
