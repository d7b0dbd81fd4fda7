use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use scanr_common::network::host::{Host, HostNames};
use tracing::{debug, warn};

use super::NameResolver;

const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Reverse DNS (PTR) resolver backed by the system resolver configuration.
///
/// The first PTR name becomes the hostname and any further names become
/// aliases, in the order the server returned them.
pub struct ReverseDnsResolver {
    resolver: TokioAsyncResolver,
}

impl ReverseDnsResolver {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let (config, mut opts) = read_system_conf().unwrap_or_else(|e| {
            warn!("Falling back to default DNS servers: {e}");
            (ResolverConfig::default(), ResolverOpts::default())
        });
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Maps the host string to an address, resolving names forward first.
    async fn to_ip(&self, host: &Host) -> Option<IpAddr> {
        if let Ok(ip) = host.as_str().parse::<IpAddr>() {
            return Some(ip);
        }
        match self.resolver.lookup_ip(host.as_str()).await {
            Ok(lookup) => lookup.iter().next(),
            Err(e) => {
                debug!(%host, "forward lookup failed: {e}");
                None
            }
        }
    }
}

impl Default for ReverseDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameResolver for ReverseDnsResolver {
    async fn resolve(&self, host: &Host) -> HostNames {
        let Some(ip) = self.to_ip(host).await else {
            return HostNames::unknown();
        };

        let lookup = match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => lookup,
            Err(e) => {
                debug!(%host, "reverse lookup failed: {e}");
                return HostNames::unknown();
            }
        };

        let names: Vec<String> = lookup.iter().map(|name| trim_root(&name.to_string())).collect();
        names_from_ptr(names)
    }
}

/// Resolver used when DNS is disabled. Every host stays "Unknown".
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledResolver;

#[async_trait]
impl NameResolver for DisabledResolver {
    async fn resolve(&self, _host: &Host) -> HostNames {
        HostNames::unknown()
    }
}

fn trim_root(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

fn names_from_ptr(names: Vec<String>) -> HostNames {
    let mut names = names.into_iter().filter(|name| !name.is_empty());
    match names.next() {
        Some(hostname) => HostNames::new(hostname, names.collect()),
        None => HostNames::unknown(),
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
