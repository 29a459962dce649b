//! Local network interface enumeration.
//!
//! The controller answers every ArtPoll with one ArtPollReply per local IPv4
//! address. Where those addresses come from is abstracted behind
//! [`InterfaceLister`] so tests and embedded users can supply a fixed list.

use std::net::Ipv4Addr;

use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};

use crate::error::{ArtNetError, Result};

/// An IPv4 address bound to a local interface, with the interface's MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalInterface {
    /// IPv4 address.
    pub ip: Ipv4Addr,
    /// MAC address, all zeros when unknown.
    pub mac: [u8; 6],
}

impl LocalInterface {
    /// Creates an entry.
    pub fn new(ip: Ipv4Addr, mac: [u8; 6]) -> Self {
        Self { ip, mac }
    }
}

/// Source of local IPv4 addresses and MACs.
pub trait InterfaceLister: Send + Sync {
    /// Lists every local IPv4 address.
    fn ipv4_interfaces(&self) -> Result<Vec<LocalInterface>>;
}

/// Queries the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceLister for SystemInterfaces {
    fn ipv4_interfaces(&self) -> Result<Vec<LocalInterface>> {
        let interfaces =
            NetworkInterface::show().map_err(|e| ArtNetError::interface_lookup(e.to_string()))?;

        Ok(interfaces
            .iter()
            .flat_map(|iface| {
                let mac = iface.mac_addr.as_deref().map(parse_mac).unwrap_or([0; 6]);
                iface.addr.iter().filter_map(move |addr| match addr {
                    Addr::V4(v4) => Some(LocalInterface::new(v4.ip, mac)),
                    Addr::V6(_) => None,
                })
            })
            .collect())
    }
}

/// A fixed list of interfaces.
///
/// # Example
///
/// ```
/// use std::net::Ipv4Addr;
/// use artnet_dmx::{InterfaceLister, LocalInterface, StaticInterfaces};
///
/// let lister = StaticInterfaces::new(vec![LocalInterface::new(
///     Ipv4Addr::new(10, 0, 0, 2),
///     [0x02, 0, 0, 0, 0, 0x01],
/// )]);
/// assert_eq!(lister.ipv4_interfaces().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticInterfaces(Vec<LocalInterface>);

impl StaticInterfaces {
    /// Creates a lister returning `interfaces`.
    pub fn new(interfaces: Vec<LocalInterface>) -> Self {
        Self(interfaces)
    }
}

impl InterfaceLister for StaticInterfaces {
    fn ipv4_interfaces(&self) -> Result<Vec<LocalInterface>> {
        Ok(self.0.clone())
    }
}

/// Parses `"aa:bb:cc:dd:ee:ff"` (or `-` separated); invalid input yields zeros.
pub(crate) fn parse_mac(text: &str) -> [u8; 6] {
    let mut mac = [0u8; 6];
    let mut parts = text.split([':', '-']);
    for byte in mac.iter_mut() {
        match parts.next().map(|p| u8::from_str_radix(p, 16)) {
            Some(Ok(value)) => *byte = value,
            _ => return [0; 6],
        }
    }
    if parts.next().is_some() {
        return [0; 6];
    }
    mac
}
