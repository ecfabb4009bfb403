//! # Inventory sweep
//!
//! Runs the link check over every device of an inventory, one device at a
//! time: connect, snapshot the interface table, probe each point-to-point
//! peer, disconnect.
//!
//! A device that cannot be connected to or snapshotted is reported and
//! skipped; it never stops the sweep. Progress is pushed to the caller as
//! [`SweepEvent`]s while the sweep runs.

use linkcheck_common::config::Config;
use linkcheck_common::device::{ConnectOptions, Device, Inventory};
use linkcheck_common::error::DeviceError;
use linkcheck_common::network::interface::{self, InterfaceTable};
use linkcheck_common::probe::LinkReport;
use linkcheck_common::warn;
use serde_json::Value;
use tracing::debug;

use crate::checker::LinkChecker;
use crate::prober::DeviceProber;

pub const SHOW_INTERFACES: &str = "show interfaces";

#[derive(Debug)]
pub enum SweepEvent<'a> {
    Connecting { device: &'a str },
    Snapshotting { device: &'a str },
    Snapshot {
        device: &'a str,
        interfaces: &'a InterfaceTable,
    },
    Report(&'a LinkReport),
    DeviceFailed {
        device: &'a str,
        error: &'a DeviceError,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub devices_checked: usize,
    pub devices_failed: usize,
    pub passed: usize,
    pub failed: usize,
}

impl SweepSummary {
    pub fn links(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.devices_failed == 0
    }
}

/// Takes the interface snapshot of a connected device.
pub fn snapshot_interfaces<D: Device + ?Sized>(device: &mut D) -> Result<InterfaceTable, DeviceError> {
    let parsed = device
        .parse(SHOW_INTERFACES)
        .map_err(DeviceError::Snapshot)?;
    let table = interface::parse_show_interfaces(&parsed)?;

    for rejected in &table.rejected {
        warn!("{}: skipping interface, {rejected}", device.name());
    }
    Ok(table)
}

pub struct Sweep {
    checker: LinkChecker,
    options: ConnectOptions,
}

impl Sweep {
    pub fn new(checker: LinkChecker, options: ConnectOptions) -> Self {
        Self { checker, options }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let options = ConnectOptions {
            strict_host_key_checking: cfg.strict_host_key_checking,
            log_stdout: cfg.log_session,
            ..ConnectOptions::default()
        };
        Self::new(LinkChecker::new(cfg.threshold), options)
    }

    pub fn checker(&self) -> &LinkChecker {
        &self.checker
    }

    pub fn run(&self, inventory: &mut Inventory, mut on_event: impl FnMut(SweepEvent<'_>)) -> SweepSummary {
        let mut summary = SweepSummary::default();

        for device in inventory.devices_mut() {
            let device: &mut dyn Device = device.as_mut();
            let name = device.name().to_string();

            match self.check_device(device, &mut on_event) {
                Ok((passed, failed)) => {
                    summary.devices_checked += 1;
                    summary.passed += passed;
                    summary.failed += failed;
                }
                Err(error) => {
                    summary.devices_failed += 1;
                    on_event(SweepEvent::DeviceFailed {
                        device: &name,
                        error: &error,
                    });
                }
            }
        }

        summary
    }

    /// Connects, takes the interface snapshot and disconnects again. No probes are sent.
    pub fn snapshot_device(&self, device: &mut dyn Device) -> Result<InterfaceTable, DeviceError> {
        device
            .connect(&self.options)
            .map_err(DeviceError::Connect)?;
        let table = snapshot_interfaces(&mut *device);
        device.disconnect();
        table
    }

    /// Connects and returns the `show interfaces` result as the device parsed it.
    pub fn raw_snapshot(&self, device: &mut dyn Device) -> Result<Value, DeviceError> {
        device
            .connect(&self.options)
            .map_err(DeviceError::Connect)?;
        let parsed = device.parse(SHOW_INTERFACES).map_err(DeviceError::Snapshot);
        device.disconnect();
        parsed
    }

    /// Checks one device, returning its passed and failed link counts.
    pub fn check_device(
        &self,
        device: &mut dyn Device,
        on_event: &mut dyn FnMut(SweepEvent<'_>),
    ) -> Result<(usize, usize), DeviceError> {
        let name = device.name().to_string();

        on_event(SweepEvent::Connecting { device: &name });
        device
            .connect(&self.options)
            .map_err(DeviceError::Connect)?;

        let result = self.check_connected(&name, device, on_event);
        device.disconnect();
        debug!("{name}: disconnected");
        result
    }

    fn check_connected(
        &self,
        name: &str,
        device: &mut dyn Device,
        on_event: &mut dyn FnMut(SweepEvent<'_>),
    ) -> Result<(usize, usize), DeviceError> {
        on_event(SweepEvent::Snapshotting { device: name });
        let table = snapshot_interfaces(&mut *device)?;
        on_event(SweepEvent::Snapshot {
            device: name,
            interfaces: &table,
        });

        let mut prober = DeviceProber::new(device);
        let (mut passed, mut failed) = (0, 0);
        for report in self.checker.check(name, &table.records, &mut prober) {
            if report.passed() {
                passed += 1;
            } else {
                failed += 1;
            }
            on_event(SweepEvent::Report(&report));
        }
        Ok((passed, failed))
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
