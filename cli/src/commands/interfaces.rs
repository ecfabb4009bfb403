use anyhow::Context;
use linkcheck_common::config::Config;
use linkcheck_common::device::{Device, Inventory};
use linkcheck_common::error::DeviceError;
use linkcheck_common::network::interface::InterfaceTable;
use linkcheck_common::{error, info};
use linkcheck_core::sweep::Sweep;
use serde_json::Value;

use crate::lprint;
use crate::source::Source;
use crate::terminal::{format, print};

type Snapshots<T> = Vec<(String, Result<T, DeviceError>)>;

/// Prints each device's interface table. `Ok(false)` when a device could not be read.
pub async fn interfaces(source: &Source, raw: bool, cfg: &Config) -> anyhow::Result<bool> {
    let inventory = source.load(cfg)?;
    info!("Reading interfaces of {} device(s) from {}", inventory.len(), source);

    if raw {
        let snapshots = snapshot_all(inventory, Sweep::from_config(cfg), |sweep, device| {
            sweep.raw_snapshot(device)
        })
        .await?;
        return print_raw(&snapshots);
    }

    let snapshots = snapshot_all(inventory, Sweep::from_config(cfg), |sweep, device| {
        sweep.snapshot_device(device)
    })
    .await?;

    print::header("interfaces", cfg.quiet);
    let mut all_read = true;
    for (idx, (device, snapshot)) in snapshots.iter().enumerate() {
        match snapshot {
            Ok(table) => print_table(idx, device, table),
            Err(e) => {
                error!("{device}: {e}");
                all_read = false;
            }
        }
        if idx + 1 != snapshots.len() {
            lprint!();
        }
    }
    Ok(all_read)
}

/// Snapshots every device on a blocking thread, in inventory order.
pub(crate) async fn snapshot_all<T, F>(
    mut inventory: Inventory,
    sweep: Sweep,
    snapshot: F,
) -> anyhow::Result<Snapshots<T>>
where
    T: Send + 'static,
    F: Fn(&Sweep, &mut dyn Device) -> Result<T, DeviceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        inventory
            .devices_mut()
            .map(|device| {
                let name = device.name().to_string();
                (name, snapshot(&sweep, device.as_mut()))
            })
            .collect()
    })
    .await
    .context("snapshot task failed")
}

fn print_table(idx: usize, device: &str, table: &InterfaceTable) {
    print::tree_head(idx, device);
    let details: Vec<format::Detail> = table.records.iter().map(format::interface_to_detail).collect();
    print::as_tree(&details);
}

fn print_raw(snapshots: &Snapshots<Value>) -> anyhow::Result<bool> {
    let mut all_read = true;
    for (device, snapshot) in snapshots {
        match snapshot {
            Ok(value) => {
                let pretty = serde_json::to_string_pretty(value)
                    .with_context(|| format!("failed to render interfaces of {device}"))?;
                lprint!(&format!("# {device}"));
                lprint!(&pretty);
            }
            Err(e) => {
                error!("{device}: {e}");
                all_read = false;
            }
        }
    }
    Ok(all_read)
}
