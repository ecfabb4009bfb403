//! # linkcheck common
//!
//! Domain models, collaborator ports and error types shared by the
//! `linkcheck` crates.
//!
//! * **[`network`]**: IPv4 bindings, subnets and the typed interface table.
//! * **[`probe`]**: probe targets, ping statistics and link reports.
//! * **[`device`]**: traits the core consumes (devices, probers, inventories).
//! * **[`error`]**: typed error kinds.
//! * **[`config`]**: run configuration.

pub mod config;
pub mod device;
pub mod error;
pub mod log;
pub mod network;
pub mod probe;

#[doc(hidden)]
pub use tracing as __tracing;
