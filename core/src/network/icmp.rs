//! ICMP echo liveness check through the platform `ping` utility.
//!
//! Using the system binary avoids raw sockets (and therefore root). All output
//! of the utility is discarded; only its exit status is looked at.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use scanr_common::network::host::{Host, HostState};
use tokio::process::Command;
use tracing::debug;

use crate::scanner::LivenessProber;

/// Slack on top of the echo timeout for process startup and teardown.
const SPAWN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct PingProber {
    timeout: Duration,
    program: String,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            program: String::from("ping"),
        }
    }

    /// Uses a different executable, e.g. a full path to `ping`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, host: &Host) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(echo_args(self.timeout))
            .arg(host.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl LivenessProber for PingProber {
    async fn probe(&self, host: &Host) -> HostState {
        let mut cmd = self.command(host);
        match tokio::time::timeout(self.timeout + SPAWN_GRACE, cmd.status()).await {
            Ok(Ok(status)) if status.success() => HostState::Online,
            Ok(Ok(status)) => {
                debug!(%host, "ping exited with {status}");
                HostState::Offline
            }
            Ok(Err(e)) => {
                debug!(%host, "could not run {}: {e}", self.program);
                HostState::Offline
            }
            Err(_) => {
                debug!(%host, "ping did not finish in time");
                HostState::Offline
            }
        }
    }
}

/// Arguments for a single echo request with the given reply timeout.
fn echo_args(timeout: Duration) -> Vec<String> {
    if cfg!(windows) {
        let millis = timeout.as_millis().max(1);
        vec!["-n".into(), "1".into(), "-w".into(), millis.to_string()]
    } else if cfg!(target_os = "macos") {
        let secs = whole_seconds(timeout);
        vec!["-c".into(), "1".into(), "-t".into(), secs.to_string()]
    } else {
        let secs = whole_seconds(timeout);
        vec!["-c".into(), "1".into(), "-W".into(), secs.to_string()]
    }
}

/// `ping` only takes whole seconds on unix; round up, never below one.
fn whole_seconds(timeout: Duration) -> u64 {
    timeout.as_millis().div_ceil(1000).max(1) as u64
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
