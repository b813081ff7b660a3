use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lifxlan_frame::{
    Frame, FrameError, FrameSocket, Header, Label, Payload, Service, SetColor, StateService, Text,
};
use lifxlan_transport::Datagram;
use tracing::{debug, info, warn};

use crate::device::format_target;
use crate::error::Result;

/// How often `serve` wakes up to re-check its running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A software light that answers requests the way a bulb does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedLight {
    target: [u8; 8],
    label: Label,
    port: u32,
    power: u16,
    color: SetColor,
}

impl SimulatedLight {
    /// Create a light that advertises UDP on `port`.
    pub fn new(target: [u8; 8], label: Label, port: u32) -> Self {
        Self {
            target,
            label,
            port,
            power: 0,
            color: SetColor::default(),
        }
    }

    pub fn target(&self) -> [u8; 8] {
        self.target
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Last power level set.
    pub fn power(&self) -> u16 {
        self.power
    }

    /// Last color set.
    pub fn color(&self) -> SetColor {
        self.color
    }

    /// Whether a request is addressed to this light.
    pub fn accepts(&self, header: &Header) -> bool {
        header.tagged || header.target == [0; 8] || header.target == self.target
    }

    /// Apply a request and build the replies, in send order.
    ///
    /// An Acknowledgement comes first when the request asks for one, then
    /// any state reply. Requests for another target, and message types a
    /// light does not answer, produce nothing.
    pub fn handle(&mut self, request: &Frame) -> Vec<Frame> {
        if !self.accepts(&request.header) {
            return Vec::new();
        }

        let mut replies = Vec::with_capacity(2);
        if request.header.ack_required {
            replies.push(self.reply(request, Payload::Acknowledgement));
        }

        let state = match request.payload {
            Payload::GetService => Some(Payload::StateService(StateService {
                service: Service::Udp,
                port: self.port,
            })),
            Payload::GetLabel => Some(Payload::StateLabel(self.label)),
            Payload::EchoRequest(echo) => {
                Some(Payload::EchoResponse(Text::from_wire(&echo.echoing)))
            }
            Payload::SetPower(power) => {
                self.power = power.level;
                None
            }
            Payload::SetColor(color) => {
                self.color = color;
                None
            }
            Payload::StateService(_)
            | Payload::StateLabel(_)
            | Payload::Acknowledgement
            | Payload::EchoResponse(_) => None,
        };

        if let Some(payload) = state {
            replies.push(self.reply(request, payload));
        }
        replies
    }

    fn reply(&self, request: &Frame, payload: Payload) -> Frame {
        Frame::new(
            Header::to_target(self.target, request.header.source, request.header.sequence),
            payload,
        )
    }
}

/// Answer requests until `running` is cleared.
///
/// `on_frame` sees every decoded request with its sender before replies go
/// out. Undecodable datagrams, connection resets and failed replies are
/// logged and skipped; any other receive error ends the loop.
pub fn serve<D, F>(
    light: &mut SimulatedLight,
    socket: &mut FrameSocket<D>,
    running: &AtomicBool,
    mut on_frame: F,
) -> Result<()>
where
    D: Datagram,
    F: FnMut(&Frame, SocketAddr),
{
    socket.set_read_timeout(Some(POLL_INTERVAL))?;
    info!(
        local = %socket.local_addr()?,
        device = %format_target(&light.target),
        "simulated light serving"
    );

    while running.load(Ordering::SeqCst) {
        let (request, addr) = match socket.recv_from() {
            Ok(received) => received,
            Err(err) if err.is_timeout() => continue,
            // ICMP port-unreachable from a departed client, reported on Windows.
            Err(FrameError::Io(err)) if err.kind() == io::ErrorKind::ConnectionReset => {
                warn!(error = %err, "peer reset, continuing");
                continue;
            }
            Err(FrameError::Io(err)) => return Err(FrameError::Io(err).into()),
            Err(err) => {
                warn!(error = %err, "dropping undecodable datagram");
                continue;
            }
        };

        on_frame(&request, addr);

        let replies = light.handle(&request);
        if replies.is_empty() {
            debug!(%addr, message_type = request.header.message_type, "no reply");
        }
        for reply in replies {
            if let Err(err) = socket.send_to(&reply, addr) {
                warn!(%addr, error = %err, "failed sending reply");
            }
        }
    }

    info!("simulated light stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use lifxlan_frame::{EchoRequest, MessageType, SetPower};

    use super::*;
    use crate::testing::{addr, ScriptedDatagram};

    const BULB: [u8; 8] = [0xD0, 0x73, 0xD5, 0x30, 0x9D, 0x57, 0, 0];

    fn light() -> SimulatedLight {
        SimulatedLight::new(BULB, "Kitchen".try_into().unwrap(), 56700)
    }

    #[test]
    fn get_service_yields_state_service_echoing_correlation() {
        let request = Frame::new(Header::broadcast(4321, 9), Payload::GetService);
        let replies = light().handle(&request);

        assert_eq!(replies.len(), 1);
        let reply = replies[0];
        assert_eq!(reply.header.source, 4321);
        assert_eq!(reply.header.sequence, 9);
        assert_eq!(reply.header.target, BULB);
        assert!(!reply.header.tagged);
        assert_eq!(reply.header.size, 41);
        assert_eq!(
            reply.payload,
            Payload::StateService(StateService {
                service: Service::Udp,
                port: 56700
            })
        );
    }

    #[test]
    fn ack_precedes_state_reply() {
        let request = Frame::new(
            Header {
                ack_required: true,
                ..Header::to_target(BULB, 1, 2)
            },
            Payload::GetLabel,
        );
        let replies = light().handle(&request);
        let types: Vec<_> = replies.iter().map(Frame::message_type).collect();
        assert_eq!(
            types,
            [MessageType::Acknowledgement, MessageType::StateLabel]
        );
        match replies[1].payload {
            Payload::StateLabel(label) => assert_eq!(label.to_string(), "Kitchen"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn set_commands_update_state() {
        let mut light = light();
        let color = SetColor {
            hue: 21845,
            saturation: 65535,
            brightness: 65535,
            kelvin: 3500,
            duration: 0,
        };

        let replies = light.handle(&Frame::new(
            Header::to_target(BULB, 1, 1),
            Payload::SetColor(color),
        ));
        assert!(replies.is_empty());
        assert_eq!(light.color(), color);

        let replies = light.handle(&Frame::new(
            Header {
                ack_required: true,
                ..Header::to_target(BULB, 1, 2)
            },
            Payload::SetPower(SetPower { level: 65535 }),
        ));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].payload, Payload::Acknowledgement);
        assert_eq!(light.power(), 65535);
    }

    #[test]
    fn echo_request_is_returned_as_text() {
        let request = Frame::new(
            Header::to_target(BULB, 1, 3),
            Payload::EchoRequest(EchoRequest::from_bytes(b"marco").unwrap()),
        );
        let replies = light().handle(&request);
        match replies[0].payload {
            Payload::EchoResponse(text) => assert_eq!(text.as_bytes(), b"marco"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn requests_for_other_targets_are_ignored() {
        let request = Frame::new(
            Header {
                ack_required: true,
                ..Header::to_target([1, 2, 3, 4, 5, 6, 0, 0], 1, 1)
            },
            Payload::GetService,
        );
        assert!(light().handle(&request).is_empty());
    }

    #[test]
    fn state_messages_get_no_reply() {
        let request = Frame::new(Header::broadcast(1, 1), Payload::Acknowledgement);
        assert!(light().handle(&request).is_empty());
    }

    #[test]
    fn serve_replies_and_survives_garbage() {
        let link = ScriptedDatagram::new();
        let client = addr("10.0.0.5:61000");
        link.push_raw(&[0xFF; 12], client);
        link.push_frame(&Frame::new(Header::broadcast(77, 5), Payload::GetService), client);

        let mut socket = FrameSocket::new(link);
        let mut light = light();
        let running = AtomicBool::new(true);
        let mut seen = Vec::new();

        serve(&mut light, &mut socket, &running, |frame, from| {
            seen.push((frame.message_type(), from));
            if seen.len() == 1 {
                running.store(false, Ordering::SeqCst);
            }
        })
        .unwrap();

        assert_eq!(seen, [(MessageType::GetService, client)]);
        let sent = socket.get_ref().sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, client);
        assert_eq!(sent[0].0.header.source, 77);
        assert_eq!(sent[0].0.header.sequence, 5);
        assert_eq!(sent[0].0.message_type(), MessageType::StateService);
    }

    #[test]
    fn serve_survives_connection_reset() {
        let link = ScriptedDatagram::new();
        let client = addr("10.0.0.5:61000");
        link.push_error(io::ErrorKind::ConnectionReset);
        link.push_frame(&Frame::new(Header::broadcast(77, 6), Payload::GetLabel), client);

        let mut socket = FrameSocket::new(link);
        let running = AtomicBool::new(true);
        serve(&mut light(), &mut socket, &running, |_, _| {
            running.store(false, Ordering::SeqCst);
        })
        .unwrap();

        let sent = socket.get_ref().sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.message_type(), MessageType::StateLabel);
    }

    #[test]
    fn serve_stops_on_other_receive_errors() {
        let link = ScriptedDatagram::new();
        link.push_error(io::ErrorKind::PermissionDenied);

        let mut socket = FrameSocket::new(link);
        let running = AtomicBool::new(true);
        let err = serve(&mut light(), &mut socket, &running, |_, _| {}).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DeviceError::Frame(FrameError::Io(ref e)) if e.kind() == io::ErrorKind::PermissionDenied
        ));
    }
}
