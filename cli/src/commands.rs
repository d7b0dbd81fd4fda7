pub mod hosts;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use scanr_common::config::{DEFAULT_HOST_PARALLELISM, DEFAULT_WORKER_BUDGET, ScanConfig};
use scanr_common::network::{host::Host, range::PortRange};

#[derive(Parser)]
#[command(name = "scanr")]
#[command(about = "Host liveness, reverse DNS and TCP port scanner.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output: -q hides headers, -qq also hides the per-host tree
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan every host of a host list
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Validate a host list and show the hosts it expands to
    #[command(alias = "h")]
    Hosts {
        /// File with one IP, IPv4 range or CIDR block per line
        file: PathBuf,
    },
}

/// How hosts are checked for liveness before their ports are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Liveness {
    /// One ICMP echo through the system `ping` utility
    Icmp,
    /// TCP handshakes against a few well-known ports
    Tcp,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// File with one IP, IPv4 range or CIDR block per line
    pub hosts_file: PathBuf,

    /// Port range to scan, `PORT` or `START-END`
    #[arg(short, long, default_value = "1-1024")]
    pub ports: PortRange,

    /// Maximum concurrent port probes per host
    #[arg(short, long, default_value_t = DEFAULT_WORKER_BUDGET)]
    pub workers: usize,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TCP connect timeout in milliseconds
    #[arg(short, long, default_value_t = 500)]
    pub timeout: u64,

    /// Liveness probe timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub ping_timeout: u64,

    /// Number of hosts scanned at the same time
    #[arg(long, default_value_t = DEFAULT_HOST_PARALLELISM)]
    pub parallel: usize,

    #[arg(long, value_enum, default_value_t = Liveness::Icmp)]
    pub liveness: Liveness,

    /// Skip reverse DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Also resolve names of hosts that did not answer the liveness probe
    #[arg(long, conflicts_with = "no_dns")]
    pub resolve_offline: bool,
}

impl ScanArgs {
    pub fn to_config(&self, hosts: Vec<Host>, quiet: u8) -> ScanConfig {
        let mut cfg = ScanConfig::new(hosts, self.ports)
            .with_worker_budget(self.workers)
            .with_connect_timeout(Duration::from_millis(self.timeout))
            .with_ping_timeout(Duration::from_millis(self.ping_timeout))
            .with_host_parallelism(self.parallel)
            .with_resolve_offline(self.resolve_offline);
        if let Some(output) = &self.output {
            cfg = cfg.with_output(output);
        }
        cfg.no_dns = self.no_dns;
        cfg.quiet = quiet;
        cfg
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
