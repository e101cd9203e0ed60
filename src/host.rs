use crate::{AutosshError, Result};
use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time::timeout;

/// Domain appended to a bare machine name when the username doubles as the host.
pub const HOST_SUFFIX: &str = "local";

/// Default bound on a single name lookup.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// A `user@host` identity as typed by the user or read from a host list.
///
/// Nothing has been resolved yet; see [`HostResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddress {
    username: String,
    raw_host: String,
}

impl HostAddress {
    /// Parse `user@host`.
    ///
    /// With `user_is_host` set, a bare `pcname` is accepted as
    /// `pcname@pcname.local`. Anything else that is not exactly one `@`
    /// with a non-empty user and host is rejected.
    pub fn parse(input: &str, user_is_host: bool) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || AutosshError::InvalidHostFormat {
            input: input.to_string(),
        };

        let mut parts = trimmed.split('@');
        let (username, raw_host) = match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(host), None) => (user.to_string(), host.to_string()),
            (Some(name), None, None) if user_is_host => {
                (name.to_string(), format!("{}.{}", name, HOST_SUFFIX))
            }
            _ => return Err(invalid()),
        };

        if username.is_empty() || raw_host.is_empty() || raw_host.starts_with('.') {
            return Err(invalid());
        }
        if username.chars().any(char::is_whitespace) || raw_host.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self { username, raw_host })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn raw_host(&self) -> &str {
        &self.raw_host
    }

    /// Attach an already-resolved IP. Only resolvers should need this.
    pub fn with_ip(self, ip: IpAddr) -> ResolvedHost {
        ResolvedHost { address: self, ip }
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.raw_host)
    }
}

/// A host whose IP has been looked up exactly once.
///
/// Every attempt against the host reuses `ip`; the type cannot be
/// re-resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost {
    address: HostAddress,
    ip: IpAddr,
}

impl ResolvedHost {
    pub fn address(&self) -> &HostAddress {
        &self.address
    }

    pub fn username(&self) -> &str {
        self.address.username()
    }

    pub fn raw_host(&self) -> &str {
        self.address.raw_host()
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// `user@ip`, the identity used in reports and exports.
    pub fn identity(&self) -> String {
        format!("{}@{}", self.username(), self.ip)
    }
}

impl fmt::Display for ResolvedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.ip)
    }
}

#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, host: HostAddress) -> Result<ResolvedHost>;
}

/// Resolver backed by the system lookup (`getaddrinfo` through tokio).
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        let timeout = if timeout.is_zero() {
            DEFAULT_RESOLVE_TIMEOUT
        } else {
            timeout
        };
        Self { timeout }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_TIMEOUT)
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: HostAddress) -> Result<ResolvedHost> {
        if let Ok(ip) = host.raw_host().parse::<IpAddr>() {
            return Ok(host.with_ip(ip));
        }

        let name = host.raw_host().to_string();
        let failed = |name: String| AutosshError::Resolution { host: name };

        // Port is required by lookup_host but irrelevant to the answer.
        let query = format!("{}:0", name);
        let mut addrs = match timeout(self.timeout, lookup_host(query)).await {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(e)) => {
                debug!("Lookup of {} failed: {}", name, e);
                return Err(failed(name));
            }
            Err(_) => {
                debug!("Lookup of {} timed out after {:?}", name, self.timeout);
                return Err(failed(name));
            }
        };

        match addrs.next() {
            Some(addr) => {
                debug!("Resolved {} to {}", name, addr.ip());
                Ok(host.with_ip(addr.ip()))
            }
            None => Err(failed(name)),
        }
    }
}
