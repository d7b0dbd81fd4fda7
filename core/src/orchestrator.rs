//! # Scan Orchestrator
//!
//! Implements the core "scan a host list" use case.
//!
//! For every host it runs the liveness probe, and for live hosts the name
//! resolver and the port sweep, assembling one [`HostRecord`] per host. The
//! resulting [`ScanReport`] always lists hosts in input order, no matter which
//! host finished first.

use std::sync::Arc;

use scanr_common::config::ScanConfig;
use scanr_common::error::ConfigError;
use scanr_common::network::host::{Host, HostNames, HostRecord};
use scanr_common::network::report::ScanReport;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::scanner::ports::{self, SweepPlan};
use crate::scanner::{LivenessProber, NameResolver, PortProber, StopSignal};

/// Called once for every host whose record is complete.
pub type HostCallback = Arc<dyn Fn(&Host, &HostRecord) + Send + Sync>;

/// Application service for a full scan.
///
/// Orchestrates the scan by:
/// 1. asking the [`LivenessProber`] whether a host is up,
/// 2. resolving its names through the [`NameResolver`],
/// 3. sweeping its ports with the [`PortProber`].
#[derive(Clone)]
pub struct Orchestrator {
    liveness: Arc<dyn LivenessProber>,
    resolver: Arc<dyn NameResolver>,
    prober: Arc<dyn PortProber>,
    stop: StopSignal,
    on_host_done: Option<HostCallback>,
}

#[derive(Debug, Clone, Copy)]
struct HostPlan {
    sweep: SweepPlan,
    resolve_offline: bool,
}

impl Orchestrator {
    pub fn new(
        liveness: Arc<dyn LivenessProber>,
        resolver: Arc<dyn NameResolver>,
        prober: Arc<dyn PortProber>,
    ) -> Self {
        Self {
            liveness,
            resolver,
            prober,
            stop: StopSignal::new(),
            on_host_done: None,
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn on_host_done(mut self, callback: HostCallback) -> Self {
        self.on_host_done = Some(callback);
        self
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Scans every host of `cfg` and returns the ordered report.
    ///
    /// The configuration is validated before anything is sent; an invalid
    /// configuration yields an error and no probe at all. Per-host failures
    /// never surface here, they only show up as negative fields in the report.
    pub async fn orchestrate(&self, cfg: &ScanConfig) -> Result<ScanReport, ConfigError> {
        cfg.validate()?;

        let plan = HostPlan {
            sweep: SweepPlan::from(cfg),
            resolve_offline: cfg.resolve_offline,
        };
        let slots = Arc::new(Semaphore::new(cfg.host_parallelism));

        info!(
            hosts = cfg.hosts.len(),
            ports = %cfg.port_range,
            workers = cfg.worker_budget,
            "Starting scan"
        );

        let handles: Vec<_> = cfg
            .hosts
            .iter()
            .cloned()
            .map(|host| {
                let this = self.clone();
                let slots = Arc::clone(&slots);
                tokio::spawn(async move {
                    let _permit = slots.acquire_owned().await;
                    let record = if this.stop.is_triggered() {
                        HostRecord::skipped()
                    } else {
                        this.scan_host(&host, plan).await
                    };
                    if let Some(callback) = &this.on_host_done {
                        callback(&host, &record);
                    }
                    record
                })
            })
            .collect();

        let mut entries: Vec<(Host, HostRecord)> = Vec::with_capacity(handles.len());
        for (host, handle) in cfg.hosts.iter().zip(handles) {
            let record = match handle.await {
                Ok(record) => record,
                Err(e) => {
                    error!(%host, "host task failed: {e}");
                    HostRecord::offline().with_scan_error(format!("host task failed: {e}"))
                }
            };
            entries.push((host.clone(), record));
        }

        let report = ScanReport::from_entries(entries);
        info!(
            online = report.online_count(),
            open_ports = report.open_port_count(),
            "Scan finished"
        );
        Ok(report)
    }

    /// Probes a single host. Never fails; every problem degrades the record.
    async fn scan_host(&self, host: &Host, plan: HostPlan) -> HostRecord {
        let state = self.liveness.probe(host).await;
        debug!(%host, %state, "liveness probe finished");

        if !state.is_online() {
            let record = HostRecord::offline();
            return if plan.resolve_offline {
                record.with_names(self.resolver.resolve(host).await)
            } else {
                record
            };
        }

        let (names, sweep): (HostNames, _) = tokio::join!(
            self.resolver.resolve(host),
            ports::scan_ports(Arc::clone(&self.prober), host, &plan.sweep, &self.stop)
        );
        let record = HostRecord::online().with_names(names);

        match sweep {
            Ok(sweep) if sweep.interrupted => {
                warn!(%host, "port sweep interrupted after {} ports", sweep.attempted);
                let note = format!(
                    "interrupted after {} of {} ports",
                    sweep.attempted,
                    plan.sweep.range.len()
                );
                record.with_open_ports(sweep.open).with_scan_error(note)
            }
            Ok(sweep) => record.with_open_ports(sweep.open),
            Err(e) => {
                error!(%host, "port sweep failed: {e}");
                record.with_scan_error(e.to_string())
            }
        }
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
    use crate::error::ScanError;
    use crate::scanner::PortState;
    use async_trait::async_trait;
    use scanr_common::network::host::HostState;
    use scanr_common::network::range::PortRange;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Online for the listed hosts, with an optional per-host delay.
    struct FakeLiveness {
        online: HashSet<String>,
        delays: HashMap<String, Duration>,
        calls: AtomicUsize,
    }

    impl FakeLiveness {
        fn online(hosts: &[&str]) -> Arc<Self> {
            Self::with_delays(hosts, &[])
        }

        fn with_delays(hosts: &[&str], delays: &[(&str, u64)]) -> Arc<Self> {
            Arc::new(Self {
                online: hosts.iter().map(|h| h.to_string()).collect(),
                delays: delays
                    .iter()
                    .map(|(h, ms)| (h.to_string(), Duration::from_millis(*ms)))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LivenessProber for FakeLiveness {
        async fn probe(&self, host: &Host) -> HostState {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(host.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            if self.online.contains(host.as_str()) {
                HostState::Online
            } else {
                HostState::Offline
            }
        }
    }

    #[derive(Default)]
    struct FakeResolver {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NameResolver for FakeResolver {
        async fn resolve(&self, host: &Host) -> HostNames {
            self.calls.lock().unwrap().push(host.to_string());
            match host.as_str() {
                "10.0.0.1" => HostNames::new("alpha.lan", vec!["alpha".into(), "www.alpha.lan".into()]),
                _ => HostNames::unknown(),
            }
        }
    }

    /// Open ports per host; counts probes per host.
    #[derive(Default)]
    struct FakePorts {
        open: HashMap<String, BTreeSet<u16>>,
        exhausted: HashSet<String>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl FakePorts {
        fn with_open(mut self, host: &str, ports: &[u16]) -> Self {
            self.open.insert(host.into(), ports.iter().copied().collect());
            self
        }

        fn exhausted_on(mut self, host: &str) -> Self {
            self.exhausted.insert(host.into());
            self
        }

        fn calls_for(&self, host: &str) -> usize {
            self.calls.lock().unwrap().get(host).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl PortProber for FakePorts {
        async fn probe(&self, host: &Host, port: u16, _timeout: Duration) -> Result<PortState, ScanError> {
            *self.calls.lock().unwrap().entry(host.to_string()).or_default() += 1;
            if self.exhausted.contains(host.as_str()) {
                return Err(ScanError::ResourceExhausted {
                    host: host.to_string(),
                    port,
                    source: io::Error::other("too many open files"),
                });
            }
            let open = self
                .open
                .get(host.as_str())
                .is_some_and(|ports| ports.contains(&port));
            Ok(if open { PortState::Open } else { PortState::Closed })
        }
    }

    fn config(hosts: &[&str], start: u16, end: u16) -> ScanConfig {
        let hosts = hosts.iter().map(|h| Host::new(*h).unwrap()).collect();
        ScanConfig::new(hosts, PortRange::new(start, end).unwrap())
    }

    #[tokio::test]
    async fn end_to_end_example() {
        let liveness = FakeLiveness::online(&["10.0.0.1"]);
        let resolver = Arc::new(FakeResolver::default());
        let ports = Arc::new(FakePorts::default().with_open("10.0.0.1", &[22, 80]));
        let orchestrator = Orchestrator::new(liveness, resolver.clone(), ports.clone());

        let report = orchestrator
            .orchestrate(&config(&["10.0.0.1", "10.0.0.2"], 1, 100))
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "10.0.0.1": {
                    "State": "Online",
                    "Hostname": "alpha.lan",
                    "Alias": ["alpha", "www.alpha.lan"],
                    "Open Ports": [22, 80]
                },
                "10.0.0.2": {
                    "State": "Offline",
                    "Hostname": "Unknown",
                    "Alias": [],
                    "Open Ports": []
                }
            })
        );
        assert_eq!(ports.calls_for("10.0.0.1"), 100);
    }

    #[tokio::test]
    async fn offline_hosts_are_never_resolved_or_swept() {
        let liveness = FakeLiveness::online(&[]);
        let resolver = Arc::new(FakeResolver::default());
        let ports = Arc::new(FakePorts::default().with_open("10.0.0.1", &[22]));
        let orchestrator = Orchestrator::new(liveness.clone(), resolver.clone(), ports.clone());

        let report = orchestrator
            .orchestrate(&config(&["10.0.0.1", "10.0.0.2", "10.0.0.3"], 1, 1024))
            .await
            .unwrap();

        assert_eq!(liveness.calls.load(Ordering::SeqCst), 3);
        assert!(resolver.calls.lock().unwrap().is_empty());
        assert!(ports.calls.lock().unwrap().is_empty());
        for (_, record) in report.iter() {
            assert_eq!(record, &HostRecord::offline());
        }
    }

    #[tokio::test]
    async fn resolve_offline_policy_resolves_dead_hosts() {
        let resolver = Arc::new(FakeResolver::default());
        let ports = Arc::new(FakePorts::default());
        let orchestrator = Orchestrator::new(FakeLiveness::online(&[]), resolver.clone(), ports.clone());

        let cfg = config(&["10.0.0.1"], 1, 10).with_resolve_offline(true);
        let report = orchestrator.orchestrate(&cfg).await.unwrap();

        let record = report.get("10.0.0.1").unwrap();
        assert_eq!(record.state, HostState::Offline);
        assert_eq!(record.hostname, "alpha.lan");
        assert!(record.open_ports.is_empty());
        assert_eq!(ports.calls_for("10.0.0.1"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn report_order_matches_input_order() {
        let hosts = ["10.0.0.4", "10.0.0.3", "10.0.0.2", "10.0.0.1"];
        // the first host finishes last
        let liveness = FakeLiveness::with_delays(
            &hosts,
            &[("10.0.0.4", 60), ("10.0.0.3", 40), ("10.0.0.2", 20)],
        );
        let finished: Arc<Mutex<Vec<String>>> = Arc::default();
        let finished_ref = Arc::clone(&finished);
        let orchestrator = Orchestrator::new(
            liveness,
            Arc::new(FakeResolver::default()),
            Arc::new(FakePorts::default()),
        )
        .on_host_done(Arc::new(move |host: &Host, _: &HostRecord| {
            finished_ref.lock().unwrap().push(host.to_string());
        }));

        let cfg = config(&hosts, 1, 5).with_host_parallelism(4);
        let report = orchestrator.orchestrate(&cfg).await.unwrap();

        let order: Vec<&str> = report.hosts().map(Host::as_str).collect();
        assert_eq!(order, hosts);
        let finished = finished.lock().unwrap();
        assert_eq!(finished.len(), 4);
        assert_eq!(finished.first().map(String::as_str), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn invalid_config_fails_before_probing() {
        let liveness = FakeLiveness::online(&["10.0.0.1"]);
        let orchestrator = Orchestrator::new(
            liveness.clone(),
            Arc::new(FakeResolver::default()),
            Arc::new(FakePorts::default()),
        );

        let err = orchestrator
            .orchestrate(&config(&["10.0.0.1"], 1, 10).with_worker_budget(0))
            .await
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroWorkerBudget);

        let err = orchestrator.orchestrate(&config(&[], 1, 10)).await.unwrap_err();
        assert_eq!(err, ConfigError::NoHosts);
        assert_eq!(liveness.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_host_does_not_affect_others() {
        let liveness = FakeLiveness::online(&["10.0.0.1", "10.0.0.2"]);
        let ports = Arc::new(
            FakePorts::default()
                .exhausted_on("10.0.0.1")
                .with_open("10.0.0.2", &[443]),
        );
        let orchestrator = Orchestrator::new(liveness, Arc::new(FakeResolver::default()), ports);

        let report = orchestrator
            .orchestrate(&config(&["10.0.0.1", "10.0.0.2"], 440, 450))
            .await
            .unwrap();

        let failed = report.get("10.0.0.1").unwrap();
        assert_eq!(failed.state, HostState::Online);
        assert_eq!(failed.hostname, "alpha.lan");
        assert!(failed.open_ports.is_empty());
        assert!(failed.scan_error.is_some());

        let healthy = report.get("10.0.0.2").unwrap();
        assert_eq!(healthy.open_ports, BTreeSet::from([443]));
        assert!(healthy.scan_error.is_none());
    }

    #[tokio::test]
    async fn triggered_stop_skips_remaining_hosts() {
        let stop = StopSignal::new();
        stop.trigger();
        let liveness = FakeLiveness::online(&["10.0.0.1"]);
        let orchestrator = Orchestrator::new(
            liveness.clone(),
            Arc::new(FakeResolver::default()),
            Arc::new(FakePorts::default()),
        )
        .with_stop_signal(stop);

        let report = orchestrator
            .orchestrate(&config(&["10.0.0.1", "10.0.0.2"], 1, 10))
            .await
            .unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(liveness.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.skipped_hosts().count(), 2);
    }

    #[tokio::test]
    async fn repeated_scans_are_identical() {
        let orchestrator = Orchestrator::new(
            FakeLiveness::online(&["10.0.0.1"]),
            Arc::new(FakeResolver::default()),
            Arc::new(FakePorts::default().with_open("10.0.0.1", &[21, 22, 23])),
        );
        let cfg = config(&["10.0.0.1", "10.0.0.9"], 1, 200).with_worker_budget(16);

        let first = orchestrator.orchestrate(&cfg).await.unwrap();
        let second = orchestrator.orchestrate(&cfg).await.unwrap();
        assert_eq!(first, second);
    }
}
