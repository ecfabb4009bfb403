//! # Snapshot inventory
//!
//! Replays devices from a JSON document of already-parsed command results,
//! so a sweep can run offline against captured state.
//!
//! ```json
//! {
//!   "devices": {
//!     "R1": {
//!       "commands": {
//!         "show interfaces": { "Gi0/0": { "ipv4": { "10.0.0.1/30": {} } } },
//!         "ping 10.0.0.2": { "ping": { "statistics": { "success_rate_percent": 100.0 } } }
//!       },
//!       "errors": { "ping 10.0.0.6": "% Unrecognized host or address" },
//!       "connect_error": null
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;

use linkcheck_common::device::{ConnectOptions, Device, Inventory, InventoryLoader};
use linkcheck_common::error::{CommandError, InventoryError};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::inventory::log_command;

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    // Kept as a raw map so device order follows the file.
    devices: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub commands: BTreeMap<String, Value>,
    /// Commands that fail, with the device's error message.
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
    #[serde(default)]
    pub connect_error: Option<String>,
}

/// A device answering from a recorded snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotDevice {
    name: String,
    snapshot: DeviceSnapshot,
    connected: bool,
    log_session: bool,
    ssh_options: Option<&'static str>,
}

impl SnapshotDevice {
    pub fn new(name: impl Into<String>, snapshot: DeviceSnapshot) -> Self {
        Self {
            name: name.into(),
            snapshot,
            connected: false,
            log_session: false,
            ssh_options: None,
        }
    }

    /// SSH options applied by the last `connect`.
    pub fn ssh_options(&self) -> Option<&'static str> {
        self.ssh_options
    }

    fn replay(&self, command: String) -> Result<Value, CommandError> {
        if let Some(reason) = self.snapshot.errors.get(&command) {
            return Err(CommandError::Failed {
                device: self.name.clone(),
                command,
                reason: reason.clone(),
            });
        }

        self.snapshot
            .commands
            .get(&command)
            .cloned()
            .ok_or(CommandError::Unsupported {
                device: self.name.clone(),
                command,
            })
    }
}

impl Device for SnapshotDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self, options: &ConnectOptions) -> Result<(), CommandError> {
        if let Some(reason) = &self.snapshot.connect_error {
            return Err(CommandError::ConnectFailed {
                device: self.name.clone(),
                reason: reason.clone(),
            });
        }

        self.ssh_options = options.ssh_options();
        if let Some(ssh_options) = self.ssh_options {
            debug!("{}: applying ssh options '{ssh_options}' to the {} connection", self.name, options.via);
        }
        self.log_session = options.log_stdout;
        self.connected = true;
        Ok(())
    }

    fn parse(&mut self, command: &str) -> Result<Value, CommandError> {
        if !self.connected {
            return Err(CommandError::NotConnected {
                device: self.name.clone(),
            });
        }

        let command = normalize(command);
        let answer = self.replay(command.clone());
        if self.log_session {
            log_command(&self.name, &command, &answer);
        }
        answer
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

/// Loads snapshot documents from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Builds an inventory from document text. `source` only names it in errors.
    pub fn from_json(source: &str, text: &str) -> Result<Inventory, InventoryError> {
        let json_error = |e| InventoryError::Json {
            path: source.to_string(),
            source: e,
        };

        let document: SnapshotDocument = serde_json::from_str(text).map_err(json_error)?;

        let mut inventory = Inventory::new();
        for (name, value) in document.devices {
            let snapshot: DeviceSnapshot = serde_json::from_value(value).map_err(json_error)?;
            let snapshot = DeviceSnapshot {
                commands: normalize_keys(snapshot.commands),
                errors: normalize_keys(snapshot.errors),
                ..snapshot
            };
            inventory.insert(Box::new(SnapshotDevice::new(name, snapshot)));
        }

        if inventory.is_empty() {
            return Err(InventoryError::Empty(source.to_string()));
        }
        Ok(inventory)
    }
}

impl InventoryLoader for SnapshotLoader {
    fn load(&self, source: &str) -> Result<Inventory, InventoryError> {
        let text = fs::read_to_string(source).map_err(|e| InventoryError::Io {
            path: source.to_string(),
            source: e,
        })?;
        Self::from_json(source, &text)
    }
}

/// Collapses runs of whitespace so `ping  10.0.0.2` finds `ping 10.0.0.2`.
fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_keys<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
    map.into_iter().map(|(k, v)| (normalize(&k), v)).collect()
}
