use std::sync::Arc;

use colored::*;
use indicatif::ProgressStyle;
use scanr_common::network::host::{Host, HostRecord};
use scanr_core::orchestrator::HostCallback;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

fn host_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} {elapsed_precise} {bar:36.cyan/blue} {pos:>4}/{len:4} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .tick_strings(TICK_STRINGS)
    .progress_chars("■■□")
}

/// Turns `span` into a bar with one step per host.
pub fn start_host_progress(span: &Span, total_hosts: usize) {
    span.pb_set_style(&host_bar_style());
    span.pb_set_length(total_hosts as u64);
    span.pb_set_message("waiting for first host...");
}

/// Callback for the orchestrator that advances the bar of `span`.
pub fn host_done_callback(span: Span) -> HostCallback {
    Arc::new(move |host: &Host, record: &HostRecord| {
        let state = match record.state.is_online() {
            true => record.state.to_string().color(colors::ONLINE),
            false => record.state.to_string().color(colors::OFFLINE),
        };
        span.pb_inc(1);
        span.pb_set_message(&format!("{} is {}", host, state));
    })
}
