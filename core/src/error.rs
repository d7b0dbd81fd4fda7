use std::io;

use thiserror::Error;

/// Failures that end a single host's port sweep.
///
/// Ordinary probe outcomes (refused, filtered, timed out) are never errors;
/// only conditions that make further probing pointless end up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("ran out of local sockets while probing {host}:{port}: {source}")]
    ResourceExhausted {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("port worker for {host} stopped unexpectedly: {reason}")]
    Worker { host: String, reason: String },
}
