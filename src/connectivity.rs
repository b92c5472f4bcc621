//! Reachability checks consulted before a load is started.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::debug;
use url::Url;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Connectivity {
    async fn is_reachable(&self) -> bool;
}

/// Reports the network as always reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

#[async_trait]
impl Connectivity for AlwaysReachable {
    async fn is_reachable(&self) -> bool {
        true
    }
}

/// Considers the network reachable when a TCP connection to the API host
/// can be opened within the timeout.
#[derive(Debug, Clone)]
pub struct HostProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HostProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port of `url`. Returns `None` if the URL has no host.
    pub fn for_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, DEFAULT_PROBE_TIMEOUT))
    }
}

#[async_trait]
impl Connectivity for HostProbe {
    async fn is_reachable(&self) -> bool {
        let addrs = match timeout(self.timeout, lookup_host((self.host.as_str(), self.port))).await {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(e)) => {
                debug!("Could not resolve {}: {}", self.host, e);
                return false;
            }
            Err(_) => {
                debug!("Resolving {} timed out", self.host);
                return false;
            }
        };

        for addr in addrs {
            match timeout(self.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_)) => return true,
                Ok(Err(e)) => debug!("Connect to {} failed: {}", addr, e),
                Err(_) => debug!("Connect to {} timed out", addr),
            }
        }
        false
    }
}
