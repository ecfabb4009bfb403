use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use linkcheck_common::config::Config;
use linkcheck_common::{error, info, success, warn};
use linkcheck_core::checker::LinkChecker;
use linkcheck_core::sweep::{Sweep, SweepEvent, SweepSummary};
use tracing::{Span, debug};

use crate::lprint;
use crate::source::Source;
use crate::terminal::{colors, format, print, spinner};

/// Runs the sweep. `Ok(false)` when a link or a device failed.
pub async fn check(source: &Source, cfg: &Config) -> anyhow::Result<bool> {
    let mut inventory = source.load(cfg)?;
    info!("Loaded {} device(s) from {}", inventory.len(), source);

    let sweep = Sweep::from_config(cfg);
    let quiet = cfg.quiet;
    let span = spinner::sweep_span();
    let start_time: Instant = Instant::now();

    let summary: SweepSummary = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        let mut progress = Progress::new(&span, quiet);
        sweep.run(&mut inventory, |event| progress.on_event(event))
    })
    .await
    .context("sweep task failed")?;

    sweep_ends(&summary, start_time.elapsed(), cfg);
    Ok(summary.all_passed())
}

struct Progress<'s> {
    span: &'s Span,
    quiet: u8,
    device: String,
    done: usize,
    total: usize,
}

impl<'s> Progress<'s> {
    fn new(span: &'s Span, quiet: u8) -> Self {
        Self {
            span,
            quiet,
            device: String::new(),
            done: 0,
            total: 0,
        }
    }

    fn on_event(&mut self, event: SweepEvent<'_>) {
        match event {
            SweepEvent::Connecting { device } => {
                self.device = device.to_string();
                spinner::connecting(self.span, device);
            }
            SweepEvent::Snapshotting { device } => spinner::snapshotting(self.span, device),
            SweepEvent::Snapshot { device, interfaces } => {
                self.done = 0;
                self.total = LinkChecker::plan(&interfaces.records).count();
                debug!(
                    "{device}: {} interfaces, {} point-to-point peers",
                    interfaces.records.len(),
                    self.total
                );
                if self.total == 0 {
                    warn!("{device}: no point-to-point links to check");
                }
                spinner::probing(self.span, device, self.done, self.total);
            }
            SweepEvent::Report(report) => {
                self.done += 1;
                if self.quiet < 2 || !report.passed() {
                    print::print_status(format::report_line(report));
                }
                spinner::probing(self.span, &self.device, self.done, self.total);
            }
            SweepEvent::DeviceFailed { device, error } => {
                error!("{device}: {error}");
            }
        }
    }
}

fn sweep_ends(summary: &SweepSummary, total_time: Duration, cfg: &Config) {
    if summary.links() == 0 && summary.devices_failed == 0 {
        warn!("No point-to-point links found");
        return;
    }

    let passed: ColoredString = format!("{} passed", summary.passed).color(colors::PASS).bold();
    let failed: ColoredString = format!("{} failed", summary.failed).color(colors::FAIL).bold();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "Check Complete: {passed}, {failed} on {} device(s) in {total_time}",
        summary.devices_checked
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            lprint!();
            if summary.all_passed() {
                success!("{}", output);
            } else {
                error!("{}", output);
            }
        }
    }

    if summary.devices_failed > 0 {
        warn!("{} device(s) could not be checked", summary.devices_failed);
    }
}
