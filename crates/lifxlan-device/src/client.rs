use std::net::SocketAddr;
use std::time::{Duration, Instant};

use lifxlan_frame::{
    EchoRequest, EchoText, Frame, FrameError, FrameSocket, Header, Label, MessageType, Payload,
    SetColor, SetPower,
};
use lifxlan_transport::Datagram;
use tracing::{debug, warn};

use crate::config::LanConfig;
use crate::device::Device;
use crate::error::{DeviceError, Result};

/// Sends requests to one light and correlates its replies.
///
/// Every request gets the next sequence number (wrapping); replies are
/// matched on `source` and `sequence`, anything else on the socket is skipped.
pub struct LightClient<D> {
    socket: FrameSocket<D>,
    addr: SocketAddr,
    target: [u8; 8],
    source: u32,
    sequence: u8,
    response_timeout: Duration,
}

impl<D: Datagram> LightClient<D> {
    /// Address the light at `addr` with identifier `target`.
    pub fn new(
        socket: FrameSocket<D>,
        addr: SocketAddr,
        target: [u8; 8],
        config: &LanConfig,
    ) -> Self {
        Self {
            socket,
            addr,
            target,
            source: config.source,
            sequence: 0,
            response_timeout: config.response_timeout,
        }
    }

    /// Address a device found by discovery.
    pub fn for_device(socket: FrameSocket<D>, device: &Device, config: &LanConfig) -> Self {
        Self::new(socket, device.service_addr(), device.target, config)
    }

    /// Sequence number of the last request sent.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn target(&self) -> [u8; 8] {
        self.target
    }

    /// Change color. With `ack`, wait for the light's Acknowledgement.
    pub fn set_color(&mut self, color: SetColor, ack: bool) -> Result<()> {
        self.command(Payload::SetColor(color), ack)
    }

    /// Change power level (0 off, 65535 on). With `ack`, wait for the
    /// light's Acknowledgement.
    pub fn set_power(&mut self, level: u16, ack: bool) -> Result<()> {
        self.command(Payload::SetPower(SetPower { level }), ack)
    }

    pub fn get_label(&mut self) -> Result<Label> {
        match self.request(Payload::GetLabel, MessageType::StateLabel)? {
            Payload::StateLabel(label) => Ok(label),
            other => Err(unexpected(MessageType::StateLabel, &other)),
        }
    }

    /// Send up to 64 bytes and return what the light echoes back.
    pub fn echo(&mut self, data: &[u8]) -> Result<EchoText> {
        let request = EchoRequest::from_bytes(data)?;
        match self.request(Payload::EchoRequest(request), MessageType::EchoResponse)? {
            Payload::EchoResponse(text) => Ok(text),
            other => Err(unexpected(MessageType::EchoResponse, &other)),
        }
    }

    /// Borrow the underlying frame socket.
    pub fn socket(&self) -> &FrameSocket<D> {
        &self.socket
    }

    fn command(&mut self, payload: Payload, ack: bool) -> Result<()> {
        let header = self.send(payload, ack)?;
        if ack {
            self.await_reply(&header, MessageType::Acknowledgement)?;
        }
        Ok(())
    }

    fn request(&mut self, payload: Payload, expected: MessageType) -> Result<Payload> {
        let header = self.send(payload, false)?;
        Ok(self.await_reply(&header, expected)?.payload)
    }

    fn send(&mut self, payload: Payload, ack: bool) -> Result<Header> {
        self.sequence = self.sequence.wrapping_add(1);
        let header = Header {
            ack_required: ack,
            ..Header::to_target(self.target, self.source, self.sequence)
        };
        let frame = Frame::new(header, payload);
        self.socket.send_to(&frame, self.addr)?;
        Ok(frame.header)
    }

    fn await_reply(&mut self, request: &Header, expected: MessageType) -> Result<Frame> {
        let deadline = Instant::now() + self.response_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DeviceError::Timeout(self.response_timeout));
            }
            self.socket.set_read_timeout(Some(remaining))?;

            let frame = match self.socket.recv_from() {
                Ok((frame, _)) => frame,
                Err(err) if err.is_timeout() => {
                    return Err(DeviceError::Timeout(self.response_timeout))
                }
                Err(FrameError::Io(err)) => return Err(FrameError::Io(err).into()),
                Err(err) => {
                    warn!(error = %err, "dropping undecodable reply");
                    continue;
                }
            };

            if frame.header.source != request.source || frame.header.sequence != request.sequence
            {
                debug!(
                    source = frame.header.source,
                    sequence = frame.header.sequence,
                    "ignoring uncorrelated frame"
                );
                continue;
            }

            let actual = frame.message_type();
            if actual == expected {
                return Ok(frame);
            }
            if actual == MessageType::Acknowledgement {
                // Ack ahead of the state reply.
                continue;
            }
            return Err(unexpected(expected, &frame.payload));
        }
    }
}

fn unexpected(expected: MessageType, payload: &Payload) -> DeviceError {
    DeviceError::UnexpectedResponse {
        expected,
        actual: payload.message_type().code(),
    }
}
