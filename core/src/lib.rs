//! The scanning engine: probes, the per-host port sweep and the multi-host
//! orchestrator.

pub mod error;
pub mod network;
pub mod orchestrator;
pub mod scanner;

pub use error::ScanError;
pub use orchestrator::Orchestrator;
pub use scanner::{LivenessProber, NameResolver, PortProber, PortState, StopSignal};
