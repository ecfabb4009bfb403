#![cfg(test)]
use linkcheck_common::config::Config;
use linkcheck_common::device::{Inventory, InventoryLoader};
use linkcheck_common::error::{DeviceError, InventoryError};
use linkcheck_common::probe::{FailCause, LinkReport, ProbeOutcome, Verdict};
use linkcheck_core::checker::LinkChecker;
use linkcheck_core::inventory::snapshot::SnapshotLoader;
use linkcheck_core::sweep::{Sweep, SweepEvent, SweepSummary};
use serde_json::json;
use std::net::Ipv4Addr;

use crate::fixtures::{self, InventoryFile};

fn load(file: &InventoryFile) -> Inventory {
    SnapshotLoader.load(&file.source()).expect("lab inventory should load")
}

fn run(sweep: &Sweep, inventory: &mut Inventory) -> (SweepSummary, Vec<LinkReport>, Vec<(String, DeviceError)>) {
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    let summary = sweep.run(inventory, |event| match event {
        SweepEvent::Report(report) => reports.push(report.clone()),
        SweepEvent::DeviceFailed { device, error } => failures.push((device.to_string(), error.clone())),
        _ => {}
    });
    (summary, reports, failures)
}

/// Sweeps the two-router lab end to end from a file on disk.
#[test]
fn lab_sweep_reports_every_link() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);

    let (summary, reports, failures) = run(&Sweep::from_config(&Config::default()), &mut inventory);

    assert!(failures.is_empty(), "unexpected device failures: {failures:?}");
    assert_eq!(
        summary,
        SweepSummary {
            devices_checked: 2,
            devices_failed: 0,
            passed: 1,
            failed: 3,
        }
    );

    let lines: Vec<(&str, &str, Ipv4Addr, Verdict)> = reports
        .iter()
        .map(|r| (r.device.as_str(), r.interface.as_str(), r.target, r.verdict()))
        .collect();
    assert_eq!(
        lines,
        [
            ("R1", "Gi0/0", Ipv4Addr::new(10, 0, 0, 2), Verdict::Pass),
            ("R1", "Gi0/1", Ipv4Addr::new(10, 0, 0, 6), Verdict::Fail),
            ("R2", "Gi0/0", Ipv4Addr::new(10, 0, 0, 1), Verdict::Fail),
            ("R2", "Gi0/1", Ipv4Addr::new(10, 0, 0, 10), Verdict::Fail),
        ]
    );
}

#[test]
fn probe_error_is_a_general_failure_and_the_sweep_goes_on() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);

    let (_, reports, _) = run(&Sweep::from_config(&Config::default()), &mut inventory);

    let no_route = &reports[1];
    let ProbeOutcome::Fail { cause } = &no_route.outcome else {
        panic!("expected a failure, got {no_route}");
    };
    assert!(matches!(cause, FailCause::Probe(_)));
    assert_eq!(
        cause.to_string(),
        "General failure: 'ping 10.0.0.6' failed on R1: % No route to host"
    );
    assert_eq!(reports.len(), 4);
}

#[test]
fn success_rate_at_threshold_fails() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);

    let (_, reports, _) = run(&Sweep::from_config(&Config::default()), &mut inventory);

    let at_threshold = &reports[3];
    assert_eq!(at_threshold.target, Ipv4Addr::new(10, 0, 0, 10));
    assert_eq!(
        at_threshold.outcome,
        ProbeOutcome::Fail {
            cause: FailCause::BelowThreshold {
                success_rate: 50.0,
                threshold: 50.0,
            }
        }
    );
}

#[test]
fn lower_threshold_lets_weak_links_pass() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);
    let cfg = Config {
        threshold: 25.0,
        ..Config::default()
    };

    let (summary, _, _) = run(&Sweep::from_config(&cfg), &mut inventory);
    assert_eq!(summary.passed, 3);
    assert_eq!(summary.failed, 1);
}

#[test]
fn repeated_sweeps_give_identical_reports() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let sweep = Sweep::from_config(&Config::default());

    let (_, first, _) = run(&sweep, &mut load(&file));
    let (_, second, _) = run(&sweep, &mut load(&file));
    assert_eq!(first, second);

    let mut inventory = load(&file);
    let (_, again, _) = run(&sweep, &mut inventory);
    let (_, and_again, _) = run(&sweep, &mut inventory);
    assert_eq!(again, and_again);
}

#[test]
fn unreachable_device_does_not_stop_the_sweep() {
    let mut lab = fixtures::lab();
    lab["devices"]["R0"] = json!({ "connect_error": "Connection timed out" });
    let file = InventoryFile::write(&lab).unwrap();
    let mut inventory = load(&file);

    let (summary, reports, failures) = run(&Sweep::from_config(&Config::default()), &mut inventory);

    assert_eq!(summary.devices_failed, 1);
    assert_eq!(summary.devices_checked, 2);
    assert_eq!(reports.len(), 4);
    assert!(!summary.all_passed());
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "R0");
    assert_eq!(
        failures[0].1.to_string(),
        "could not connect to R0: Connection timed out"
    );
}

#[test]
fn device_selection_narrows_the_sweep() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);
    inventory.select(&["R2".to_string()]).unwrap();

    let (summary, reports, _) = run(&Sweep::from_config(&Config::default()), &mut inventory);
    assert_eq!(summary.devices_checked, 1);
    assert!(reports.iter().all(|r| r.device == "R2"));

    let mut inventory = load(&file);
    assert!(matches!(
        inventory.select(&["R9".to_string()]),
        Err(InventoryError::UnknownDevice(name)) if name == "R9"
    ));
}

#[test]
fn missing_inventory_is_fatal() {
    let result = SnapshotLoader.load("/nonexistent/linkcheck/lab.json");
    let err = result.unwrap_err();
    assert!(matches!(err, InventoryError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/linkcheck/lab.json"));
}

#[test]
fn plan_lists_the_same_peers_the_sweep_pings() {
    let file = InventoryFile::write(&fixtures::lab()).unwrap();
    let mut inventory = load(&file);
    let sweep = Sweep::from_config(&Config::default());

    let mut planned = Vec::new();
    for device in inventory.devices_mut() {
        let table = sweep.snapshot_device(device.as_mut()).unwrap();
        planned.extend(LinkChecker::plan(&table.records).map(|t| t.address));
    }

    let (_, reports, _) = run(&sweep, &mut load(&file));
    let pinged: Vec<Ipv4Addr> = reports.iter().map(|r| r.target).collect();
    assert_eq!(planned, pinged);
    assert!(file.path().exists());
}
