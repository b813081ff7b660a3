use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};
use crate::traits::Datagram;

/// Smallest read timeout handed to the OS; `std` rejects a zero duration.
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// UDP socket transport.
///
/// Wraps a bound [`UdpSocket`]. Clients bind an ephemeral port with
/// [`bind_any`](Self::bind_any) and enable broadcast for discovery;
/// responders bind the well-known LIFX port.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind a UDP socket to `addr`.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| TransportError::Bind { addr, source })?;
        let local = socket.local_addr()?;
        info!(%local, "bound udp socket");
        Ok(Self { socket })
    }

    /// Bind to an ephemeral port on all IPv4 interfaces.
    pub fn bind_any() -> Result<Self> {
        Self::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
    }

    /// Allow sending to broadcast addresses (`SO_BROADCAST`).
    pub fn enable_broadcast(&self) -> Result<()> {
        self.socket
            .set_broadcast(true)
            .map_err(|source| TransportError::Configure {
                option: "SO_BROADCAST",
                source,
            })?;
        debug!("broadcast enabled");
        Ok(())
    }

    /// Borrow the underlying socket.
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

impl Datagram for UdpTransport {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        let sent = self.socket.send_to(buf, addr)?;
        trace!(%addr, bytes = sent, "sent datagram");
        Ok(sent)
    }

    fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        let (len, addr) = self.socket.recv_from(buf)?;
        trace!(%addr, bytes = len, "received datagram");
        Ok((len, addr))
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.socket
            .set_read_timeout(timeout.map(|t| t.max(MIN_READ_TIMEOUT)))
            .map_err(|source| TransportError::Configure {
                option: "SO_RCVTIMEO",
                source,
            })
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }
}
