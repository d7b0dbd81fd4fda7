use std::collections::BTreeSet;

use colored::*;
use scanr_common::network::host::{HostRecord, UNKNOWN_HOSTNAME};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Collapses consecutive ports into ranges, e.g. `20-25, 80, 443`.
pub fn compress_ports(ports: &BTreeSet<u16>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = ports.iter().copied();

    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;

    for port in iter {
        if port == end + 1 {
            end = port;
            continue;
        }
        parts.push(span_to_string(start, end));
        start = port;
        end = port;
    }
    parts.push(span_to_string(start, end));

    parts.join(", ")
}

fn span_to_string(start: u16, end: u16) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

pub fn record_to_details(record: &HostRecord) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    let state = match record.state.is_online() {
        true => record.state.to_string().color(colors::ONLINE).bold(),
        false => record.state.to_string().color(colors::OFFLINE),
    };
    details.push(("State".to_string(), state));

    if record.hostname != UNKNOWN_HOSTNAME {
        details.push((
            "Name".to_string(),
            record.hostname.color(colors::HOSTNAME),
        ));
    }

    for alias in &record.aliases {
        details.push(("Alias".to_string(), alias.normal()));
    }

    if !record.open_ports.is_empty() {
        let ports = compress_ports(&record.open_ports);
        details.push(("Ports".to_string(), ports.color(colors::PORT)));
    }

    if let Some(note) = &record.scan_error {
        details.push(("Error".to_string(), note.color(colors::ERROR)));
    }

    details
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
    use scanr_common::network::host::HostNames;

    fn keys(details: &[Detail]) -> Vec<&str> {
        details.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn compress_ports_merges_runs() {
        let ports: BTreeSet<u16> = [20, 21, 22, 23, 24, 25, 80, 443, 444].into_iter().collect();
        assert_eq!(compress_ports(&ports), "20-25, 80, 443-444");
    }

    #[test]
    fn compress_ports_handles_edges() {
        assert_eq!(compress_ports(&BTreeSet::new()), "");
        assert_eq!(compress_ports(&BTreeSet::from([65535])), "65535");
        assert_eq!(compress_ports(&BTreeSet::from([65534, 65535])), "65534-65535");
    }

    #[test]
    fn offline_record_only_shows_state() {
        let details = record_to_details(&HostRecord::offline());
        assert_eq!(keys(&details), vec!["State"]);
    }

    #[test]
    fn online_record_lists_names_and_ports() {
        let record = HostRecord::online()
            .with_names(HostNames::new("alpha.lan", vec!["alpha".into(), "www.alpha.lan".into()]))
            .with_open_ports(BTreeSet::from([22, 80]))
            .with_scan_error("interrupted after 10 of 1024 ports");
        let details = record_to_details(&record);

        assert_eq!(keys(&details), vec!["State", "Name", "Alias", "Alias", "Ports", "Error"]);
        assert_eq!(&*details[4].1, "22, 80");
    }
}
