use std::fs;
use std::path::Path;

use anyhow::Context;
use scanr_common::network::report::ScanReport;
use scanr_common::{success, warn};

/// Writes the report as pretty JSON, replacing any existing file.
pub fn write_report(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    let mut json = report
        .to_json_pretty()
        .context("serializing scan report")?;
    json.push('\n');

    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    success!("Report written to {}", path.display());

    if let Some(notice) = skipped_notice(report) {
        warn!("{notice}");
    }
    Ok(())
}

/// Hosts skipped by an interrupt are saved as Offline; say which ones they are.
fn skipped_notice(report: &ScanReport) -> Option<String> {
    let skipped: Vec<&str> = report.skipped_hosts().map(|host| host.as_str()).collect();
    if skipped.is_empty() {
        return None;
    }
    Some(format!(
        "{} hosts were never probed and are saved as Offline: {}",
        skipped.len(),
        skipped.join(", ")
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
