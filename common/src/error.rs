use thiserror::Error;

/// Rejections raised while building or validating a scan configuration.
///
/// All of these are reported before the first packet leaves the machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("host list is empty")]
    NoHosts,

    #[error("host entry is blank or contains whitespace: {0:?}")]
    InvalidHost(String),

    #[error("host {0} appears more than once")]
    DuplicateHost(String),

    #[error("invalid port range {start}-{end}: expected 1 <= start <= end <= 65535")]
    InvalidPortRange { start: u32, end: u32 },

    #[error("cannot parse port range {0:?}: expected `PORT` or `START-END`")]
    MalformedPortRange(String),

    #[error("worker budget must be at least 1")]
    ZeroWorkerBudget,

    #[error("host parallelism must be at least 1")]
    ZeroHostParallelism,

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}
