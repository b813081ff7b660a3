use std::net::SocketAddr;
use std::time::Duration;

use crate::error::Result;

/// A connectionless endpoint that moves whole datagrams.
///
/// [`UdpTransport`](crate::UdpTransport) is the production implementation.
/// Higher layers are generic over this trait so they can be driven by an
/// in-memory endpoint in tests.
pub trait Datagram {
    /// Send one datagram to `addr`, returning the number of bytes sent.
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize>;

    /// Receive one datagram into `buf`, returning its length and sender.
    ///
    /// Datagrams longer than `buf` are truncated by the OS.
    fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)>;

    /// Set the receive timeout. `None` blocks indefinitely.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()>;

    /// Local address this endpoint is bound to.
    fn local_addr(&self) -> Result<SocketAddr>;
}

impl<T: Datagram + ?Sized> Datagram for &T {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        (**self).send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        (**self).recv_from(buf)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_read_timeout(timeout)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        (**self).local_addr()
    }
}
