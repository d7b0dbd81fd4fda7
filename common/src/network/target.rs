//! # Host List Parsing
//!
//! Turns the lines of a host-list file into the validated, de-duplicated,
//! ordered list of [`Host`]s the scanner works on.
//!
//! Each non-comment line may be:
//! * A single IP address (e.g., `192.168.1.5`, `::1`).
//! * An IPv4 Range (e.g., `192.168.1.1-100` or `192.168.1.1-192.168.1.100`).
//! * A CIDR block (e.g., `192.168.1.0/24`).

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;

use crate::error::ConfigError;
use crate::network::host::Host;
use crate::network::range::{self, Ipv4Range};
use crate::{success, warn};

/// Upper bound on the number of addresses a single range line may expand to.
pub const MAX_RANGE_HOSTS: u64 = 65_536;

/// A single parsed line of a host list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A single specific host.
    Host { target_addr: IpAddr },
    /// A range of IPv4 addresses.
    Range { ipv4_range: Ipv4Range },
}

impl FromStr for Target {
    type Err = String;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Host**: Single IPv4/IPv6 address (e.g., "192.168.1.5").
    /// * **Range**: "Start-End" (e.g., "192.168.1.1-50", "192.168.1.1-192.168.1.50").
    /// * **CIDR**: "Network/Prefix" (e.g., "192.168.1.0/24").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if let Some(target) = parse_ip_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_cidr_range(s)? {
            return Ok(target);
        }

        Err(format!("invalid target: {s}"))
    }
}

impl Target {
    /// Number of addresses this target expands to.
    pub fn len(&self) -> u64 {
        match self {
            Target::Host { .. } => 1,
            Target::Range { ipv4_range } => {
                let start: u32 = ipv4_range.start_addr.into();
                let end: u32 = ipv4_range.end_addr.into();
                u64::from(end.saturating_sub(start)) + u64::from(start <= end)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_hosts(&self) -> Vec<Host> {
        let to_host = |ip: IpAddr| Host::new(ip.to_string());
        match self {
            Target::Host { target_addr } => to_host(*target_addr).into_iter().collect(),
            Target::Range { ipv4_range } => ipv4_range
                .to_iter()
                .filter_map(|ip| to_host(ip).ok())
                .collect(),
        }
    }
}

/// Parses the contents of a host list.
///
/// Blank lines and `#` comments are ignored, invalid lines are skipped with a
/// warning, and repeated addresses keep their first position.
pub fn parse_host_list(contents: &str) -> Result<Vec<Host>, ConfigError> {
    let mut seen: HashSet<Host> = HashSet::new();
    let mut hosts: Vec<Host> = Vec::new();

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let target = match Target::from_str(line) {
            Ok(target) => target,
            Err(e) => {
                warn!("Skipping line {}: {e}", idx + 1);
                continue;
            }
        };

        if target.len() > MAX_RANGE_HOSTS {
            warn!(
                "Skipping line {}: {line} expands to {} addresses (limit {MAX_RANGE_HOSTS})",
                idx + 1,
                target.len()
            );
            continue;
        }

        for host in target.to_hosts() {
            if seen.insert(host.clone()) {
                hosts.push(host);
            }
        }
    }

    if hosts.is_empty() {
        return Err(ConfigError::NoHosts);
    }
    Ok(hosts)
}

/// Reads and parses a host-list file.
pub fn load_host_file(path: &Path) -> anyhow::Result<Vec<Host>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading host list {}", path.display()))?;
    let hosts = parse_host_list(&contents)
        .with_context(|| format!("no usable hosts in {}", path.display()))?;

    let len: usize = hosts.len();
    let unit: &str = if len == 1 { "host has been" } else { "hosts have been" };
    success!("{len} {unit} parsed successfully");

    Ok(hosts)
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| Target::Host { target_addr })
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<Target>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start_addr = start_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid start IP in range '{start_str}': {e}"))?;

    let end_addr = parse_range_end_addr(end_str.trim(), &start_addr, s)?;
    if end_addr < start_addr {
        return Err(format!("Range ends before it starts: {s}"));
    }

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(Target::Range { ipv4_range }))
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {original_s}"));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<Target>, String> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid IP in CIDR '{ip_str}': {e}"))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| format!("Invalid prefix in CIDR '{prefix_str}': {e}"))?;

    let ipv4_range = range::cidr_range(ipv4_addr, prefix).map_err(|e| e.to_string())?;

    Ok(Some(Target::Range { ipv4_range }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
