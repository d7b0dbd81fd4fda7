use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::ConfigError;

/// A closed interval of TCP ports, `1 <= start <= end <= 65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ConfigError> {
        if start == 0 || start > end {
            return Err(ConfigError::InvalidPortRange {
                start: start.into(),
                end: end.into(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn single(port: u16) -> Result<Self, ConfigError> {
        Self::new(port, port)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range. Never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

}

impl Default for PortRange {
    fn default() -> Self {
        Self { start: 1, end: 1024 }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = ConfigError;

    /// Parses `"80"` or `"1-1024"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedPortRange(s.to_string());
        let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| malformed());

        let Some((start, end)) = s.split_once('-') else {
            let port = parse(s)?;
            let single = u16::try_from(port)
                .map_err(|_| ConfigError::InvalidPortRange { start: port, end: port })?;
            return Self::single(single);
        };
        let (start, end) = (parse(start)?, parse(end)?);

        if start == 0 || start > end || end > u32::from(u16::MAX) {
            return Err(ConfigError::InvalidPortRange { start, end });
        }
        Self::new(start as u16, end as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }
}

pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = pnet::ipnetwork::Ipv4Network::new(ip, prefix)?;
    let start = network.network();
    let end = network.broadcast();

    Ok(Ipv4Range::new(start, end))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
