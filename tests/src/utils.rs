use std::path::PathBuf;
use std::time::Duration;

use scanr_common::config::ScanConfig;
use scanr_common::network::host::Host;
use scanr_common::network::range::PortRange;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const LOOPBACK: &str = "127.0.0.1";

/// Binds a listener on an ephemeral loopback port and accepts forever.
pub async fn listen() -> u16 {
    let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    port
}

/// A loopback port that nothing listens on right now.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

pub fn write_host_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("hosts.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn loopback_config(range: PortRange) -> ScanConfig {
    ScanConfig::new(vec![Host::new(LOOPBACK).unwrap()], range)
        .with_worker_budget(16)
        .with_connect_timeout(Duration::from_millis(300))
}
