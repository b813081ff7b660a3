use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use lifxlan_frame::DEFAULT_PORT;

/// Default client correlation id. Nonzero so devices unicast their replies.
pub const DEFAULT_SOURCE: u32 = 1234;

/// Default discovery listening window.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_millis(500);

/// Default wait for an acknowledgement or state reply.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Network settings shared by discovery and the light client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanConfig {
    /// Device UDP port.
    pub port: u16,
    /// Destination for tagged discovery frames.
    pub broadcast: Ipv4Addr,
    /// Correlation id stamped on every outgoing frame.
    pub source: u32,
    /// How long discovery collects StateService replies.
    pub discovery_timeout: Duration,
    /// How long the client waits for a correlated reply.
    pub response_timeout: Duration,
}

impl Default for LanConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            broadcast: Ipv4Addr::BROADCAST,
            source: DEFAULT_SOURCE,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

impl LanConfig {
    /// Broadcast destination for discovery.
    pub fn broadcast_addr(&self) -> SocketAddr {
        SocketAddr::from((self.broadcast, self.port))
    }
}
