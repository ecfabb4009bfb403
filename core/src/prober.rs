use std::net::Ipv4Addr;

use linkcheck_common::device::{Device, Prober};
use linkcheck_common::error::ProbeError;
use linkcheck_common::probe::PingStatistics;

pub fn ping_command(target: Ipv4Addr) -> String {
    format!("ping {target}")
}

/// Pings from the device itself by running `ping <addr>` through its parser.
pub struct DeviceProber<'a, D: Device + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: Device + ?Sized> DeviceProber<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self { device }
    }
}

impl<D: Device + ?Sized> Prober for DeviceProber<'_, D> {
    fn ping(&mut self, target: Ipv4Addr) -> Result<PingStatistics, ProbeError> {
        let parsed = self.device.parse(&ping_command(target))?;
        PingStatistics::from_parsed(&parsed)
    }
}
