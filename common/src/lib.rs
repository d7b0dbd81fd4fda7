//! Shared building blocks for the `scanr` workspace.
//!
//! Holds the data model (hosts, port ranges, records and reports), the scan
//! configuration with its validation rules, and host-list parsing. Nothing in
//! here touches the network.

pub mod config;
pub mod error;
pub mod network;

/// Logs a success message, rendered with a distinct symbol by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::info!(target: "scanr::success", $($arg)*)
    };
}

pub use tracing::{debug, error, info, warn};
