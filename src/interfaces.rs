//! Local interface address sources.
//!
//! - [`SystemInterfaces`] - asks the OS via `pnet`
//! - [`StaticInterfaces`] - a fixed list, for tests and dry runs

use crate::models::InterfaceAddress;
use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

pub trait InterfaceSource {
    /// Every IPv4 (address, netmask) pair, in interface order.
    fn addresses(&self) -> Vec<InterfaceAddress>;
}

/// Interfaces of the running host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn addresses(&self) -> Vec<InterfaceAddress> {
        let interfaces: Vec<NetworkInterface> = datalink::interfaces();
        log::debug!("Found {} network interface(s)", interfaces.len());
        interfaces.iter().flat_map(ipv4_addresses).collect()
    }
}

fn ipv4_addresses(interface: &NetworkInterface) -> Vec<InterfaceAddress> {
    interface
        .ips
        .iter()
        .filter_map(|net| match net {
            IpNetwork::V4(v4) => Some(InterfaceAddress::new(
                &interface.name,
                &v4.ip().to_string(),
                &v4.mask().to_string(),
            )),
            IpNetwork::V6(_) => None,
        })
        .collect()
}

/// A fixed set of addresses.
#[derive(Debug, Default, Clone)]
pub struct StaticInterfaces(pub Vec<InterfaceAddress>);

impl InterfaceSource for StaticInterfaces {
    fn addresses(&self) -> Vec<InterfaceAddress> {
        self.0.clone()
    }
}
