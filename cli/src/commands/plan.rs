use colored::*;
use linkcheck_common::config::Config;
use linkcheck_common::probe::ProbeTarget;
use linkcheck_common::{error, info, success};
use linkcheck_core::checker::LinkChecker;
use linkcheck_core::sweep::Sweep;

use crate::commands::interfaces::snapshot_all;
use crate::lprint;
use crate::source::Source;
use crate::terminal::{colors, format, print};

/// Lists the peers a check would ping. Nothing is probed.
pub async fn plan(source: &Source, cfg: &Config) -> anyhow::Result<bool> {
    let inventory = source.load(cfg)?;
    info!("Planning probes for {} device(s) from {}", inventory.len(), source);

    let snapshots = snapshot_all(inventory, Sweep::from_config(cfg), |sweep, device| {
        sweep.snapshot_device(device)
    })
    .await?;

    print::header("probe plan", cfg.quiet);
    let mut all_read = true;
    let mut total = 0;
    for (idx, (device, snapshot)) in snapshots.iter().enumerate() {
        match snapshot {
            Ok(table) => {
                let targets: Vec<ProbeTarget> = LinkChecker::plan(&table.records).collect();
                total += targets.len();
                if cfg.quiet < 2 {
                    print_targets(idx, device, &targets);
                }
            }
            Err(e) => {
                error!("{device}: {e}");
                all_read = false;
            }
        }
        if cfg.quiet < 2 && idx + 1 != snapshots.len() {
            lprint!();
        }
    }

    let output: String = format!(
        "{} peer(s) to probe on {} device(s)",
        total.to_string().color(colors::ACCENT).bold(),
        snapshots.len()
    );
    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
    Ok(all_read)
}

fn print_targets(idx: usize, device: &str, targets: &[ProbeTarget]) {
    print::tree_head(idx, device);
    if targets.is_empty() {
        print::as_tree(&[("links".to_string(), "none".dimmed())]);
        return;
    }
    let details: Vec<format::Detail> = targets.iter().map(format::target_to_detail).collect();
    print::as_tree(&details);
}
