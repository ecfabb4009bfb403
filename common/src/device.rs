//! # Collaborator ports
//!
//! Contracts the link check consumes but does not implement itself:
//!
//! * [`Device`]: a managed device that can be connected to and asked to run
//!   a command, answering with structured (already parsed) data.
//! * [`Prober`]: anything that can ping an IPv4 address and report a success rate.
//! * [`InventoryLoader`]: turns an inventory identifier into an [`Inventory`].
//!
//! Concrete adapters live in `linkcheck-core`; tests supply their own mocks.

use std::net::Ipv4Addr;

use serde_json::Value;

use crate::error::{CommandError, InventoryError, ProbeError};
use crate::probe::PingStatistics;

/// SSH options that stop host key verification for a connection.
pub const NO_HOST_KEY_CHECKING: &str = "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null";

/// Per-connection settings handed to [`Device::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Connection name to use, e.g. `cli`.
    pub via: String,
    /// Log every command the session runs and what came back.
    pub log_stdout: bool,
    pub strict_host_key_checking: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            via: "cli".to_string(),
            log_stdout: false,
            strict_host_key_checking: false,
        }
    }
}

impl ConnectOptions {
    /// Extra SSH options to apply to the connection, if any.
    pub fn ssh_options(&self) -> Option<&'static str> {
        if self.strict_host_key_checking {
            None
        } else {
            Some(NO_HOST_KEY_CHECKING)
        }
    }
}

/// A managed network device.
pub trait Device: Send {
    /// Stable name of the device within its inventory.
    fn name(&self) -> &str;

    fn connect(&mut self, options: &ConnectOptions) -> Result<(), CommandError>;

    /// Runs `command` and returns its parsed, structured result.
    fn parse(&mut self, command: &str) -> Result<Value, CommandError>;

    fn disconnect(&mut self) {}
}

/// Issues one ping and reports its statistics.
pub trait Prober {
    fn ping(&mut self, target: Ipv4Addr) -> Result<PingStatistics, ProbeError>;
}

impl<P: Prober + ?Sized> Prober for &mut P {
    fn ping(&mut self, target: Ipv4Addr) -> Result<PingStatistics, ProbeError> {
        (**self).ping(target)
    }
}

/// Loads an inventory from an identifier (a path, a URL, a keyword...).
pub trait InventoryLoader {
    fn load(&self, source: &str) -> Result<Inventory, InventoryError>;
}

/// Named devices in the order the inventory lists them.
#[derive(Default)]
pub struct Inventory {
    devices: Vec<Box<dyn Device>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device, replacing an earlier one with the same name.
    pub fn insert(&mut self, device: Box<dyn Device>) {
        match self.devices.iter().position(|d| d.name() == device.name()) {
            Some(idx) => self.devices[idx] = device,
            None => self.devices.push(device),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.name())
    }

    pub fn devices_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Device>> {
        self.devices.iter_mut()
    }

    /// Keeps only the named devices, in inventory order.
    ///
    /// An empty selection keeps everything. Naming a device the inventory
    /// does not have is an error.
    pub fn select(&mut self, names: &[String]) -> Result<(), InventoryError> {
        if names.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = names.iter().find(|n| self.devices.iter().all(|d| d.name() != n.as_str())) {
            return Err(InventoryError::UnknownDevice(unknown.clone()));
        }
        self.devices.retain(|d| names.iter().any(|n| n == d.name()));
        Ok(())
    }
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
