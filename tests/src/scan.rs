use std::sync::Arc;
use std::time::Duration;

use scanr_common::network::host::{Host, HostState};
use scanr_common::network::range::PortRange;
use scanr_common::network::target::load_host_file;
use scanr_core::network::tcp::{HandshakeProber, TcpConnectProber};
use scanr_core::scanner::ports::{SweepPlan, scan_ports};
use scanr_core::scanner::resolver::DisabledResolver;
use scanr_core::{LivenessProber, Orchestrator, PortProber, PortState, StopSignal};

use crate::utils::{LOOPBACK, closed_port, listen, loopback_config, write_host_file};

fn loopback() -> Host {
    Host::new(LOOPBACK).unwrap()
}

fn handshake_on(port: u16) -> Arc<HandshakeProber> {
    Arc::new(HandshakeProber::new(Duration::from_millis(500)).with_ports([port]))
}

#[tokio::test]
async fn connect_probe_tells_open_from_closed() {
    let open = listen().await;
    let closed = closed_port().await;
    let timeout = Duration::from_millis(300);

    let prober = TcpConnectProber;
    assert_eq!(prober.probe(&loopback(), open, timeout).await.unwrap(), PortState::Open);
    assert_eq!(prober.probe(&loopback(), closed, timeout).await.unwrap(), PortState::Closed);
}

#[tokio::test]
async fn sweep_finds_local_listeners() {
    let first = listen().await;
    let second = listen().await;
    let range = PortRange::new(first.min(second), first.max(second)).unwrap();
    let plan = SweepPlan {
        range,
        budget: 32,
        timeout: Duration::from_millis(300),
    };

    let sweep = scan_ports(Arc::new(TcpConnectProber), &loopback(), &plan, &StopSignal::new())
        .await
        .unwrap();

    assert!(sweep.open.contains(&first), "{first} missing from {:?}", sweep.open);
    assert!(sweep.open.contains(&second), "{second} missing from {:?}", sweep.open);
    assert_eq!(sweep.attempted, range.len());
    assert!(!sweep.interrupted);
}

#[tokio::test]
async fn refused_handshake_still_means_online() {
    let closed = closed_port().await;
    assert_eq!(handshake_on(closed).probe(&loopback()).await, HostState::Online);
}

#[tokio::test]
async fn host_file_to_json_report() {
    let port = listen().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_host_file(&dir, "# lab\n127.0.0.1\n\n127.0.0.1\nnot a host\n");

    let hosts = load_host_file(&path).unwrap();
    assert_eq!(hosts, vec![loopback()]);

    let mut cfg = loopback_config(PortRange::single(port).unwrap());
    cfg.hosts = hosts;

    let orchestrator = Orchestrator::new(
        handshake_on(port),
        Arc::new(DisabledResolver),
        Arc::new(TcpConnectProber),
    );
    let report = orchestrator.orchestrate(&cfg).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "127.0.0.1": {
                "State": "Online",
                "Hostname": "Unknown",
                "Alias": [],
                "Open Ports": [port]
            }
        })
    );
}

#[tokio::test]
async fn repeated_scans_agree() {
    let port = listen().await;
    let cfg = loopback_config(PortRange::single(port).unwrap());
    let orchestrator = Orchestrator::new(
        handshake_on(port),
        Arc::new(DisabledResolver),
        Arc::new(TcpConnectProber),
    );

    let first = orchestrator.orchestrate(&cfg).await.unwrap();
    let second = orchestrator.orchestrate(&cfg).await.unwrap();
    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
}

#[tokio::test]
async fn stopped_scan_still_reports_every_host() {
    let port = listen().await;
    let cfg = loopback_config(PortRange::single(port).unwrap());
    let stop = StopSignal::new();
    stop.trigger();

    let orchestrator = Orchestrator::new(
        handshake_on(port),
        Arc::new(DisabledResolver),
        Arc::new(TcpConnectProber),
    )
    .with_stop_signal(stop);
    let report = orchestrator.orchestrate(&cfg).await.unwrap();

    let record = report.get(LOOPBACK).unwrap();
    assert_eq!(record.state, HostState::Offline);
    assert!(record.scan_error.is_some());
}
