//! # Scan Report
//!
//! The final, ordered mapping from [`Host`] to [`HostRecord`].
//!
//! Entries keep the order in which the hosts were supplied, which is also the
//! key order of the serialized JSON object.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use super::host::{Host, HostRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    entries: Vec<(Host, HostRecord)>,
}

impl ScanReport {
    /// Builds a report from `(host, record)` pairs, keeping the first record
    /// for any host that appears twice.
    pub fn from_entries(entries: impl IntoIterator<Item = (Host, HostRecord)>) -> Self {
        let mut seen: HashSet<Host> = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|(host, _)| seen.insert(host.clone()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, host: &str) -> Option<&HostRecord> {
        self.entries
            .iter()
            .find(|(h, _)| h.as_str() == host)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Host, &HostRecord)> {
        self.entries.iter().map(|(host, record)| (host, record))
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.entries.iter().map(|(host, _)| host)
    }

    /// Hosts that were never probed because the scan was stopped first.
    pub fn skipped_hosts(&self) -> impl Iterator<Item = &Host> {
        self.entries
            .iter()
            .filter(|(_, record)| record.was_skipped())
            .map(|(host, _)| host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn online_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, record)| record.state.is_online())
            .count()
    }

    pub fn open_port_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, record)| record.open_ports.len())
            .sum()
    }

    /// Renders the report as pretty JSON with a four-space indent.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (host, record) in &self.entries {
            map.serialize_entry(host.as_str(), record)?;
        }
        map.end()
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
