//! # Link reachability checker
//!
//! For every interface bound to a /30 the other usable address of the subnet
//! is the far end of a point-to-point link. Each such peer is pinged once and
//! the success rate is compared against the threshold.
//!
//! The checker holds no state besides the threshold. Probes go through the
//! injected [`Prober`], so the same input against the same prober always
//! yields the same reports.

use linkcheck_common::config::DEFAULT_THRESHOLD;
use linkcheck_common::device::Prober;
use linkcheck_common::network::interface::InterfaceRecord;
use linkcheck_common::probe::{FailCause, LinkReport, ProbeOutcome, ProbeTarget, Verdict};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkChecker {
    threshold: f64,
}

impl Default for LinkChecker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LinkChecker {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Peers to ping for one interface.
    ///
    /// Empty unless the interface has an IPv4 binding with a /30 prefix.
    pub fn probe_targets(record: &InterfaceRecord) -> Vec<ProbeTarget> {
        let Some(binding) = record.ipv4 else {
            return Vec::new();
        };

        let subnet = binding.subnet();
        if !subnet.is_point_to_point() {
            return Vec::new();
        }

        let Some(hosts) = subnet.usable_hosts() else {
            return Vec::new();
        };

        hosts
            .iter()
            .filter(|addr| *addr != binding.address())
            .map(|address| ProbeTarget {
                interface: record.name.clone(),
                local: binding.address(),
                subnet,
                address,
            })
            .collect()
    }

    /// Every peer of every interface, in interface order.
    pub fn plan<'a>(interfaces: &'a [InterfaceRecord]) -> impl Iterator<Item = ProbeTarget> + 'a {
        interfaces.iter().flat_map(Self::probe_targets)
    }

    /// PASS only when the success rate is strictly above the threshold.
    pub fn classify(&self, success_rate: f64) -> Verdict {
        if success_rate > self.threshold {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Pings one target and turns the answer into a report.
    ///
    /// Probe errors become a failed report; they never escape.
    pub fn probe<P: Prober + ?Sized>(
        &self,
        device: &str,
        target: ProbeTarget,
        prober: &mut P,
    ) -> LinkReport {
        debug!("Pinging {} from {} on {}", target.address, target.local, target.interface);

        let outcome = match prober.ping(target.address) {
            Ok(stats) => match self.classify(stats.success_rate) {
                Verdict::Pass => ProbeOutcome::Pass {
                    success_rate: stats.success_rate,
                },
                Verdict::Fail => ProbeOutcome::Fail {
                    cause: FailCause::BelowThreshold {
                        success_rate: stats.success_rate,
                        threshold: self.threshold,
                    },
                },
            },
            Err(e) => ProbeOutcome::Fail {
                cause: FailCause::Probe(e),
            },
        };

        LinkReport {
            device: device.to_string(),
            interface: target.interface,
            target: target.address,
            outcome,
        }
    }

    /// Checks every point-to-point link of one device.
    ///
    /// The returned iterator is lazy: each `next()` issues exactly one probe.
    pub fn check<'a, P: Prober + ?Sized>(
        &'a self,
        device: &'a str,
        interfaces: &'a [InterfaceRecord],
        prober: &'a mut P,
    ) -> impl Iterator<Item = LinkReport> + 'a {
        Self::plan(interfaces).map(move |target| self.probe(device, target, prober))
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
