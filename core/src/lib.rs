//! # linkcheck core
//!
//! The point-to-point link check and the machinery around it.
//!
//! * **[`checker`]**: finds /30 links in an interface table, pings the peer on each and
//!   classifies the result. Pure apart from the injected [`Prober`](linkcheck_common::device::Prober).
//! * **[`prober`]**: adapts any [`Device`](linkcheck_common::device::Device) into a prober.
//! * **[`sweep`]**: runs the check over every device of an inventory.
//! * **[`inventory`]**: bundled inventory adapters (snapshot files, the local machine).

pub mod checker;
pub mod inventory;
pub mod prober;
pub mod sweep;
