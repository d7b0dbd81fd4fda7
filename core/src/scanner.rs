//! The central **abstraction** for scanning operations.
//!
//! This module defines the seams the orchestrator talks to: a liveness probe,
//! a name resolver and a port probe. Concrete strategies live in
//! [`crate::network`] and [`resolver`], test doubles live next to the tests.
//!
//! **Architectural Note:**
//! High-level modules should strictly depend on these traits rather than
//! concrete probers. This keeps the port sweep and the orchestrator free of
//! socket details and lets them be exercised against deterministic mocks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scanr_common::network::host::{Host, HostNames, HostState};
use tokio::sync::watch;

use crate::error::ScanError;

pub mod ports;
pub mod resolver;

/// Decides whether a host is reachable at all.
///
/// Implementations never fail: anything that is not a positive answer within
/// their timeout is [`HostState::Offline`].
#[async_trait]
pub trait LivenessProber: Send + Sync {
    async fn probe(&self, host: &Host) -> HostState;
}

/// Reverse name lookup for a host.
///
/// Implementations never fail: unresolvable hosts map to [`HostNames::unknown`].
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, host: &Host) -> HostNames;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    Open,
    /// Refused, filtered, unreachable or timed out.
    Closed,
}

impl PortState {
    pub fn is_open(self) -> bool {
        matches!(self, PortState::Open)
    }
}

/// Defines the strategy for probing a single transport-layer port.
#[async_trait]
pub trait PortProber: Send + Sync {
    /// Probes `host:port`, giving up after `timeout`.
    ///
    /// Returns an error only when the local machine cannot continue probing
    /// (e.g. it ran out of file descriptors).
    async fn probe(&self, host: &Host, port: u16, timeout: Duration) -> Result<PortState, ScanError>;
}

/// Cooperative cancellation shared by every task of a scan.
///
/// Once triggered it stays triggered. Workers check it before claiming new
/// work and race it against in-flight probes.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`trigger`](Self::trigger) has been called.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
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
