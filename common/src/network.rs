//! # Network models
//!
//! * [`range::Ipv4Range`]: an inclusive run of IPv4 addresses.
//! * [`subnet::Ipv4Binding`] and [`subnet::Subnet`]: an address bound to an interface and the
//!   network it sits in.
//! * [`interface::InterfaceRecord`]: one interface of a device snapshot, validated from the
//!   parser's structured output.

pub mod interface;
pub mod range;
pub mod subnet;
