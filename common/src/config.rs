use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::host::Host;
use crate::network::range::PortRange;

pub const DEFAULT_WORKER_BUDGET: usize = 100;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_HOST_PARALLELISM: usize = 1;

/// Everything a scan run needs, passed explicitly into the orchestrator.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Targets in the order they are reported.
    pub hosts: Vec<Host>,
    pub port_range: PortRange,
    /// Upper bound on in-flight port probes for a single host.
    pub worker_budget: usize,
    /// Where the JSON report is written. `None` keeps it in memory only.
    pub output: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub ping_timeout: Duration,
    /// How many hosts are processed at the same time.
    pub host_parallelism: usize,
    /// Resolve names of hosts that failed the liveness probe as well.
    pub resolve_offline: bool,
    /// Disables reverse DNS lookups entirely.
    pub no_dns: bool,
    pub quiet: u8,
}

impl ScanConfig {
    pub fn new(hosts: Vec<Host>, port_range: PortRange) -> Self {
        Self {
            hosts,
            port_range,
            worker_budget: DEFAULT_WORKER_BUDGET,
            output: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            host_parallelism: DEFAULT_HOST_PARALLELISM,
            resolve_offline: false,
            no_dns: false,
            quiet: 0,
        }
    }

    pub fn with_worker_budget(mut self, worker_budget: usize) -> Self {
        self.worker_budget = worker_budget;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    pub fn with_host_parallelism(mut self, parallelism: usize) -> Self {
        self.host_parallelism = parallelism;
        self
    }

    pub fn with_resolve_offline(mut self, resolve_offline: bool) -> Self {
        self.resolve_offline = resolve_offline;
        self
    }

    /// Checks every invariant a scan relies on.
    ///
    /// Runs before any probing so a bad configuration never produces a
    /// partial scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.hosts.len());
        for host in &self.hosts {
            let addr = host.as_str();
            if addr.is_empty() || addr.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidHost(addr.to_string()));
            }
            if !seen.insert(addr) {
                return Err(ConfigError::DuplicateHost(addr.to_string()));
            }
        }

        PortRange::new(self.port_range.start(), self.port_range.end())?;

        if self.worker_budget == 0 {
            return Err(ConfigError::ZeroWorkerBudget);
        }
        if self.host_parallelism == 0 {
            return Err(ConfigError::ZeroHostParallelism);
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("connect"));
        }
        if self.ping_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("ping"));
        }
        Ok(())
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
