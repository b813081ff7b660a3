use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;
use lifxlan_transport::{Datagram, TransportError};
use tracing::debug;

use crate::codec::{decode_frame, encode_frame, Frame};
use crate::error::{FrameError, Result};
use crate::message::FRAME_SIZE_MAX;

/// Sends and receives whole frames over a datagram endpoint.
///
/// One frame per datagram. The receive buffer is reused across calls; each
/// decode sees exactly the received length.
pub struct FrameSocket<D> {
    inner: D,
    buf: BytesMut,
}

impl<D: Datagram> FrameSocket<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            buf: BytesMut::zeroed(FRAME_SIZE_MAX),
        }
    }

    /// Encode `frame` and send it as one datagram to `addr`.
    pub fn send_to(&mut self, frame: &Frame, addr: SocketAddr) -> Result<usize> {
        let len = encode_frame(frame, &mut self.buf)?;
        let sent = self
            .inner
            .send_to(&self.buf[..len], addr)
            .map_err(transport_to_frame_error)?;
        debug!(
            %addr,
            message_type = frame.header.message_type,
            source = frame.header.source,
            sequence = frame.header.sequence,
            bytes = sent,
            "sent frame"
        );
        Ok(sent)
    }

    /// Receive one datagram and decode it.
    ///
    /// A read timeout surfaces as an error for which
    /// [`FrameError::is_timeout`] is true.
    pub fn recv_from(&mut self) -> Result<(Frame, SocketAddr)> {
        let (len, addr) = self
            .inner
            .recv_from(&mut self.buf)
            .map_err(transport_to_frame_error)?;
        let frame = decode_frame(&self.buf[..len])?;
        debug!(
            %addr,
            message_type = frame.header.message_type,
            source = frame.header.source,
            sequence = frame.header.sequence,
            bytes = len,
            "received frame"
        );
        Ok((frame, addr))
    }

    /// Set the receive timeout on the underlying endpoint.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner
            .set_read_timeout(timeout)
            .map_err(transport_to_frame_error)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.inner.local_addr().map_err(transport_to_frame_error)
    }

    /// Borrow the underlying endpoint.
    pub fn get_ref(&self) -> &D {
        &self.inner
    }
}

fn transport_to_frame_error(err: TransportError) -> FrameError {
    match err {
        TransportError::Io(io) => FrameError::Io(io),
        TransportError::Bind { source, .. } | TransportError::Configure { source, .. } => {
            FrameError::Io(source)
        }
    }
}
