use std::path::Path;

use colored::*;
use scanr_common::network::host::Host;
use scanr_common::network::target::load_host_file;

use crate::terminal::{colors, print};

/// Shows what a host list expands to without sending a single packet.
pub fn hosts(file: &Path, quiet: u8) -> anyhow::Result<()> {
    let hosts: Vec<Host> = load_host_file(file)?;

    if quiet < 2 {
        for (idx, host) in hosts.iter().enumerate() {
            print::host_tree(idx, host.as_str(), &[]);
        }
    }

    let total: ColoredString = format!("{} hosts", hosts.len()).bold().green();
    let line = format!("Host list ready: {total}").color(colors::TEXT_DEFAULT);
    print::summary(&line.to_string(), quiet);
    Ok(())
}
