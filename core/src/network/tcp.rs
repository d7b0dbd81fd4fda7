use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use scanr_common::network::host::{Host, HostState};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::error::ScanError;
use crate::scanner::{LivenessProber, PortProber, PortState};

/// Ports tried by [`HandshakeProber`] when ICMP is not an option.
pub const HANDSHAKE_PORTS: [u16; 4] = [443, 80, 22, 445];

/// Full TCP connect probe. A completed handshake means the port is open.
///
/// The stream is dropped as soon as the handshake completes, no payload is
/// exchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnectProber;

#[async_trait]
impl PortProber for TcpConnectProber {
    async fn probe(&self, host: &Host, port: u16, probe_timeout: Duration) -> Result<PortState, ScanError> {
        match timeout(probe_timeout, connect(host, port)).await {
            Ok(Ok(_stream)) => Ok(PortState::Open),
            Ok(Err(e)) if is_descriptor_exhaustion(&e) => Err(ScanError::ResourceExhausted {
                host: host.to_string(),
                port,
                source: e,
            }),
            Ok(Err(_)) | Err(_) => Ok(PortState::Closed),
        }
    }
}

/// Reachability check via TCP handshakes against a few well-known ports.
///
/// A host counts as online if any port either accepts or actively refuses the
/// connection within the timeout; silence on every port means offline.
#[derive(Debug, Clone)]
pub struct HandshakeProber {
    timeout: Duration,
    ports: Vec<u16>,
}

impl HandshakeProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ports: HANDSHAKE_PORTS.to_vec(),
        }
    }

    pub fn with_ports(mut self, ports: impl Into<Vec<u16>>) -> Self {
        self.ports = ports.into();
        self
    }
}

#[async_trait]
impl LivenessProber for HandshakeProber {
    async fn probe(&self, host: &Host) -> HostState {
        let mut attempts: JoinSet<bool> = JoinSet::new();
        for &port in &self.ports {
            let host = host.clone();
            attempts.spawn(async move { handshake_probe(&host, port).await });
        }

        let answered = timeout(self.timeout, async {
            while let Some(joined) = attempts.join_next().await {
                if matches!(joined, Ok(true)) {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        attempts.abort_all();
        if answered { HostState::Online } else { HostState::Offline }
    }
}

/// Any answer from the remote TCP stack, accept or refuse, proves the host is up.
async fn handshake_probe(host: &Host, port: u16) -> bool {
    match connect(host, port).await {
        Ok(_) => true,
        Err(e) => e.kind() == io::ErrorKind::ConnectionRefused,
    }
}

async fn connect(host: &Host, port: u16) -> io::Result<TcpStream> {
    match host.as_str().parse::<IpAddr>() {
        Ok(ip) => TcpStream::connect(SocketAddr::new(ip, port)).await,
        Err(_) => TcpStream::connect((host.as_str(), port)).await,
    }
}

#[cfg(unix)]
fn is_descriptor_exhaustion(e: &io::Error) -> bool {
    // EMFILE, ENFILE
    matches!(e.raw_os_error(), Some(24) | Some(23))
}

#[cfg(windows)]
fn is_descriptor_exhaustion(e: &io::Error) -> bool {
    // WSAEMFILE, WSAENOBUFS
    matches!(e.raw_os_error(), Some(10024) | Some(10055))
}

#[cfg(not(any(unix, windows)))]
fn is_descriptor_exhaustion(_e: &io::Error) -> bool {
    false
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
