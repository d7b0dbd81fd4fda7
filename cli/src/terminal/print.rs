//! Terminal rendering of a scan: the run header, the scan plan, one tree per
//! host and the closing summary.
//!
//! Everything goes through `tracing` on the `scanr::print` target so that it
//! shares the progress bar's writer with regular log lines.

use colored::*;
use scanr_common::success;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::format::Detail;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;
const DETAIL_KEY_WIDTH: usize = 7;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn blank() {
    print("");
}

fn rule(ch: &str, width: usize) -> ColoredString {
    ch.repeat(width).color(colors::SEPARATOR)
}

/// `══ title ══` spanning [`TOTAL_WIDTH`] columns.
fn titled_rule(title: ColoredString, ch: &str) -> String {
    let width = console::measure_text_width(&title);
    let dashes = TOTAL_WIDTH.saturating_sub(width + 2);
    let left = dashes / 2;
    format!("{} {} {}", rule(ch, left), title, rule(ch, dashes - left))
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }
    let title = format!("scanr v{}", env!("CARGO_PKG_VERSION")).bold().color(colors::ONLINE);
    print(&titled_rule(title, "═"));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&titled_rule(msg.to_uppercase().color(colors::ONLINE), "─"));
}

/// The settings a scan runs with, as an aligned `key....: value` block.
pub fn scan_plan(rows: &[(&str, String)]) {
    let key_width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in rows {
        let dots = ".".repeat(key_width + 1 - key.len());
        print(&format!(
            "{} {}{}{} {}",
            ">".color(colors::SEPARATOR),
            key.color(colors::PRIMARY),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value.color(colors::TEXT_DEFAULT)
        ));
    }
}

/// `[idx] host` followed by one branch per detail.
pub fn host_tree(idx: usize, host: &str, details: &[Detail]) {
    print(&format!(
        "{} {}",
        format!("[{}]", idx.to_string().color(colors::ACCENT)).color(colors::SEPARATOR),
        host.color(colors::PRIMARY)
    ));

    for (i, (key, value)) in details.iter().enumerate() {
        let branch = if i + 1 == details.len() { "└─" } else { "├─" };
        let dots = ".".repeat(DETAIL_KEY_WIDTH.saturating_sub(key.len()));
        print(&format!(
            " {} {}{}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

/// Closing line of a command: centered under a rule, or a plain success
/// line when the output is quieted.
pub fn summary(line: &str, q_level: u8) {
    match q_level {
        0 => {
            print(&rule("═", TOTAL_WIDTH).to_string());
            let pad = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(line)) / 2);
            print(&format!("{pad}{line}"));
        }
        _ => {
            blank();
            success!("{}", line);
        }
    }
}

const NO_HOSTS_ONLINE: &str = r#"
         _   _  ___    _   _  ___  ____ _____ ____
        | \ | |/ _ \  | | | |/ _ \/ ___|_   _/ ___|
        |  \| | | | | | |_| | | | \___ \ | | \___ \
        | |\  | |_| | |  _  | |_| |___) || |  ___) |
        |_| \_|\___/  |_| |_|\___/|____/ |_| |____/
"#;

pub fn no_hosts_online() {
    print(&NO_HOSTS_ONLINE.color(colors::OFFLINE).bold().to_string());
}

pub fn end_of_program(q_level: u8) {
    if q_level > 1 {
        return;
    }
    print(&rule("═", TOTAL_WIDTH).to_string());
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
    fn titled_rule_fills_the_line() {
        for title in ["scan results", "ZERO HOSTS ONLINE", "x"] {
            let line = titled_rule(title.normal(), "─");
            assert_eq!(console::measure_text_width(&line), TOTAL_WIDTH, "{title}");
        }
    }

    #[test]
    fn overlong_title_does_not_panic() {
        let title = "h".repeat(TOTAL_WIDTH * 2);
        let line = titled_rule(title.normal(), "═");
        assert!(console::measure_text_width(&line) >= TOTAL_WIDTH);
    }
}
