//! # IPv4 bindings and subnets
//!
//! An [`Ipv4Binding`] is the address/prefix pair configured on an interface.
//! Its [`Subnet`] is the network block it belongs to.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::DataShapeError;
use crate::network::range::Ipv4Range;

/// Prefix length of a point-to-point link with exactly two usable hosts.
pub const POINT_TO_POINT_PREFIX: u8 = 30;

/// An IPv4 address bound to an interface together with its prefix length.
///
/// The address is always a host address of its subnet: for prefixes up to
/// /30 the network and broadcast addresses are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Binding {
    host: Ipv4Network,
    subnet: Subnet,
}

impl Ipv4Binding {
    pub fn new(address: Ipv4Addr, prefix_len: u32) -> Result<Self, DataShapeError> {
        let out_of_range = || DataShapeError::PrefixOutOfRange(prefix_len);
        let prefix = u8::try_from(prefix_len).map_err(|_| out_of_range())?;
        let host = Ipv4Network::new(address, prefix).map_err(|_| out_of_range())?;
        let subnet = Subnet(Ipv4Network::new(host.network(), prefix).map_err(|_| out_of_range())?);

        if subnet.has_network_and_broadcast() && (address == subnet.network() || address == subnet.broadcast()) {
            return Err(DataShapeError::ReservedAddress(host.to_string()));
        }
        Ok(Self { host, subnet })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.host.ip()
    }

    pub fn prefix_len(&self) -> u8 {
        self.host.prefix()
    }

    pub fn subnet(&self) -> Subnet {
        self.subnet
    }
}

impl fmt::Display for Ipv4Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix_len())
    }
}

/// Parses "address/prefix", e.g. `10.0.0.1/30`.
impl FromStr for Ipv4Binding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((ip_str, prefix_str)) = s.trim().split_once('/') else {
            return Err(format!("missing prefix length in '{s}'"));
        };

        let address = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|e| format!("invalid IPv4 address '{ip_str}': {e}"))?;

        let prefix_len = prefix_str
            .parse::<u32>()
            .map_err(|e| format!("invalid prefix length '{prefix_str}': {e}"))?;

        Ipv4Binding::new(address, prefix_len).map_err(|e| e.to_string())
    }
}

/// A network block: network address plus prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet(Ipv4Network);

impl Subnet {
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.0.broadcast()
    }

    pub fn is_point_to_point(&self) -> bool {
        self.prefix_len() == POINT_TO_POINT_PREFIX
    }

    /// /31 and /32 use every address of the block.
    fn has_network_and_broadcast(&self) -> bool {
        self.prefix_len() < 31
    }

    /// Addresses between the network and broadcast address.
    ///
    /// `None` for /31 and /32, which have no network/broadcast pair to strip.
    pub fn usable_hosts(&self) -> Option<Ipv4Range> {
        if !self.has_network_and_broadcast() {
            return None;
        }
        let start = u32::from(self.network()) + 1;
        let end = u32::from(self.broadcast()) - 1;
        Some(Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
