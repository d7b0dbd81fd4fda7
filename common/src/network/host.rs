//! # Host Model
//!
//! A [`Host`] is the address string a user asked us to scan, and a
//! [`HostRecord`] is everything we learned about it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// Placeholder used whenever no hostname could be resolved.
pub const UNKNOWN_HOSTNAME: &str = "Unknown";
/// Note attached to hosts that were never probed because the scan was stopped.
pub const SKIPPED_NOTE: &str = "skipped: scan interrupted";

/// An opaque target address (IPv4, IPv6 or hostname).
///
/// Only the bare minimum is checked here: the string must be non-empty, free
/// of whitespace and must not start with `-`. Anything stricter belongs to the
/// host-list loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Host(String);

impl Host {
    pub fn new(addr: impl Into<String>) -> Result<Self, ConfigError> {
        let addr: String = addr.into();
        // a leading dash would be taken as an option by external tools like `ping`
        if addr.is_empty() || addr.starts_with('-') || addr.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHost(addr));
        }
        Ok(Self(addr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Host {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HostState {
    Online,
    Offline,
}

impl HostState {
    pub fn is_online(self) -> bool {
        matches!(self, HostState::Online)
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostState::Online => f.write_str("Online"),
            HostState::Offline => f.write_str("Offline"),
        }
    }
}

/// Canonical name plus aliases, as returned by a name resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostNames {
    pub hostname: String,
    pub aliases: Vec<String>,
}

impl HostNames {
    pub fn new(hostname: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            hostname: hostname.into(),
            aliases,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_HOSTNAME, Vec::new())
    }

    pub fn is_unknown(&self) -> bool {
        self.hostname == UNKNOWN_HOSTNAME
    }
}

impl Default for HostNames {
    fn default() -> Self {
        Self::unknown()
    }
}

/// The scan result for a single host.
///
/// Field names on the wire are fixed for compatibility with existing reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    #[serde(rename = "State")]
    pub state: HostState,
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "Alias")]
    pub aliases: Vec<String>,
    #[serde(rename = "Open Ports")]
    pub open_ports: BTreeSet<u16>,
    /// Set when the port sweep for this host was aborted by a fatal error.
    #[serde(skip)]
    pub scan_error: Option<String>,
}

impl HostRecord {
    /// The record of a host that did not answer the liveness probe.
    pub fn offline() -> Self {
        Self {
            state: HostState::Offline,
            hostname: UNKNOWN_HOSTNAME.to_string(),
            aliases: Vec::new(),
            open_ports: BTreeSet::new(),
            scan_error: None,
        }
    }

    pub fn online() -> Self {
        Self {
            state: HostState::Online,
            ..Self::offline()
        }
    }

    /// The record of a host that was never probed.
    pub fn skipped() -> Self {
        Self::offline().with_scan_error(SKIPPED_NOTE)
    }

    pub fn was_skipped(&self) -> bool {
        self.scan_error.as_deref() == Some(SKIPPED_NOTE)
    }

    pub fn with_names(mut self, names: HostNames) -> Self {
        self.hostname = names.hostname;
        self.aliases = names.aliases;
        self
    }

    pub fn with_open_ports(mut self, ports: BTreeSet<u16>) -> Self {
        self.open_ports = ports;
        self
    }

    pub fn with_scan_error(mut self, reason: impl Into<String>) -> Self {
        self.scan_error = Some(reason.into());
        self
    }
}

impl Default for HostRecord {
    fn default() -> Self {
        Self::offline()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_rejects_blank_and_whitespace() {
        assert_eq!(Host::new(""), Err(ConfigError::InvalidHost(String::new())));
        assert!(Host::new("10.0.0.1 ").is_err());
        assert!(Host::new("10.0.\t0.1").is_err());
    }

    #[test]
    fn host_rejects_option_like_strings() {
        assert_eq!(Host::new("-f"), Err(ConfigError::InvalidHost("-f".into())));
        assert!(Host::new("-i0.001").is_err());
        assert!(Host::new("a-b.lan").is_ok());
    }

    #[test]
    fn host_accepts_addresses_and_names() {
        for addr in ["10.0.0.1", "::1", "fe80::1%eth0", "router.lan"] {
            let host: Host = addr.parse().unwrap();
            assert_eq!(host.as_str(), addr);
        }
    }

    #[test]
    fn offline_record_has_defaults() {
        let record = HostRecord::offline();
        assert_eq!(record.state, HostState::Offline);
        assert_eq!(record.hostname, UNKNOWN_HOSTNAME);
        assert!(record.aliases.is_empty());
        assert!(record.open_ports.is_empty());
    }

    #[test]
    fn record_serializes_with_fixed_field_names() {
        let record = HostRecord::online()
            .with_names(HostNames::new("gw.lan", vec!["router".into()]))
            .with_open_ports(BTreeSet::from([443, 22, 80]))
            .with_scan_error("ignored on the wire");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "State": "Online",
                "Hostname": "gw.lan",
                "Alias": ["router"],
                "Open Ports": [22, 80, 443]
            })
        );
    }
}
