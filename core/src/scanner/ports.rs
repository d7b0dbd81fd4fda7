//! Bounded-concurrency TCP port sweep for a single host.
//!
//! A fixed pool of workers shares one cursor over the port range. Each worker
//! claims the next port, probes it and records open ports in a shared set, so
//! at most `budget` probes are ever in flight and every port is attempted
//! exactly once.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use scanr_common::config::ScanConfig;
use scanr_common::network::{host::Host, range::PortRange};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::{PortProber, StopSignal};
use crate::error::ScanError;

/// Parameters of one host's port sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepPlan {
    pub range: PortRange,
    /// Maximum number of probes in flight at once.
    pub budget: usize,
    pub timeout: Duration,
}

impl From<&ScanConfig> for SweepPlan {
    fn from(cfg: &ScanConfig) -> Self {
        Self {
            range: cfg.port_range,
            budget: cfg.worker_budget,
            timeout: cfg.connect_timeout,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSweep {
    pub open: BTreeSet<u16>,
    /// Ports whose probe ran to completion.
    pub attempted: usize,
    /// The sweep was stopped before every port was attempted.
    pub interrupted: bool,
}

/// Probes every port of `plan.range` on `host` and collects the open ones.
///
/// Returns only after all workers have finished. A triggered `stop` aborts
/// in-flight probes and yields the ports found so far with
/// [`PortSweep::interrupted`] set.
pub async fn scan_ports(
    prober: Arc<dyn PortProber>,
    host: &Host,
    plan: &SweepPlan,
    stop: &StopSignal,
) -> Result<PortSweep, ScanError> {
    let total: usize = plan.range.len();
    let worker_count: usize = plan.budget.max(1).min(total);
    let cursor = Arc::new(AtomicU32::new(u32::from(plan.range.start())));
    let last = u32::from(plan.range.end());
    let open_ports: Arc<Mutex<BTreeSet<u16>>> = Arc::new(Mutex::new(BTreeSet::new()));

    debug!(%host, range = %plan.range, workers = worker_count, "starting port sweep");

    let mut workers: JoinSet<Result<usize, ScanError>> = JoinSet::new();
    for _ in 0..worker_count {
        let prober = Arc::clone(&prober);
        let host = host.clone();
        let cursor = Arc::clone(&cursor);
        let open_ports = Arc::clone(&open_ports);
        let stop = stop.clone();
        let timeout = plan.timeout;

        workers.spawn(async move {
            let mut attempted: usize = 0;
            while !stop.is_triggered() {
                let next = cursor.fetch_add(1, Ordering::Relaxed);
                if next > last {
                    break;
                }
                // next <= last <= u16::MAX
                let port = next as u16;

                let state = tokio::select! {
                    biased;
                    _ = stop.triggered() => break,
                    state = prober.probe(&host, port, timeout) => state?,
                };

                attempted += 1;
                if state.is_open() {
                    open_ports.lock().await.insert(port);
                }
            }
            Ok::<usize, ScanError>(attempted)
        });
    }

    let mut attempted: usize = 0;
    let mut failure: Option<ScanError> = None;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(count)) => attempted += count,
            Ok(Err(e)) => {
                if failure.is_none() {
                    warn!(%host, "aborting port sweep: {e}");
                    workers.abort_all();
                    failure = Some(e);
                }
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                if failure.is_none() {
                    workers.abort_all();
                    failure = Some(ScanError::Worker {
                        host: host.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }

    let open = std::mem::take(&mut *open_ports.lock().await);
    let interrupted = attempted < total;
    debug!(%host, open = open.len(), attempted, interrupted, "port sweep finished");

    Ok(PortSweep {
        open,
        attempted,
        interrupted,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
