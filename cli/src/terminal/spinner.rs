use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// Span whose progress bar shows what the sweep is doing right now.
pub fn sweep_span() -> Span {
    let span = info_span!("sweep", indicatif.pb_show = true);
    span.pb_set_style(&style());
    span
}

pub fn connecting(span: &Span, device: &str) {
    span.pb_set_message(&format!("Connecting to {}...", device.bold()));
}

pub fn snapshotting(span: &Span, device: &str) {
    span.pb_set_message(&format!("Reading interfaces of {}...", device.bold()));
}

pub fn probing(span: &Span, device: &str, done: usize, total: usize) {
    span.pb_set_message(&format!(
        "Probing links of {} ({}/{})...",
        device.bold(),
        done.to_string().green().bold(),
        total
    ));
}
