//! # Bundled inventories
//!
//! Concrete [`InventoryLoader`](linkcheck_common::device::InventoryLoader)s shipped with the tool:
//!
//! * [`snapshot`]: devices replayed from a JSON document of parsed command results.
//! * [`local`]: the machine running the tool, probing its neighbours with TCP handshakes.

pub mod local;
pub mod snapshot;

use linkcheck_common::error::CommandError;
use serde_json::Value;
use tracing::info;

/// Writes one command and what the device answered to the session log.
pub(crate) fn log_command(device: &str, command: &str, answer: &Result<Value, CommandError>) {
    match answer {
        Ok(value) => info!("{device}# {command}\n{value:#}"),
        Err(e) => info!("{device}# {command}\n{e}"),
    }
}
