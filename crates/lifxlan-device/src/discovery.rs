use std::net::SocketAddr;
use std::time::Instant;

use lifxlan_frame::{Frame, FrameError, FrameSocket, Header, Payload};
use lifxlan_transport::Datagram;
use tracing::{debug, info, warn};

use crate::config::LanConfig;
use crate::device::Device;
use crate::error::Result;

/// Sequence number stamped on discovery broadcasts.
pub const DISCOVERY_SEQUENCE: u8 = 1;

/// Broadcast a GetService and collect StateService replies.
///
/// Listens until `config.discovery_timeout` has elapsed, then returns every
/// distinct device that answered with our source id. Datagrams that fail to
/// decode or belong to another client are skipped.
///
/// The endpoint must already permit broadcast when `config.broadcast` is a
/// broadcast address.
pub fn discover<D: Datagram>(
    socket: &mut FrameSocket<D>,
    config: &LanConfig,
) -> Result<Vec<Device>> {
    let request = Frame::new(
        Header::broadcast(config.source, DISCOVERY_SEQUENCE),
        Payload::GetService,
    );
    let dest = config.broadcast_addr();
    socket.send_to(&request, dest)?;
    info!(%dest, timeout = ?config.discovery_timeout, "sent discovery broadcast");

    let deadline = Instant::now() + config.discovery_timeout;
    let mut devices: Vec<Device> = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        socket.set_read_timeout(Some(remaining))?;

        let (frame, addr) = match socket.recv_from() {
            Ok(received) => received,
            Err(err) if err.is_timeout() => break,
            Err(FrameError::Io(err)) => return Err(FrameError::Io(err).into()),
            Err(err) => {
                warn!(error = %err, "skipping undecodable datagram");
                continue;
            }
        };

        let Some(device) = device_from_reply(&frame, addr, config.source) else {
            debug!(%addr, message_type = frame.header.message_type, "ignoring unrelated frame");
            continue;
        };

        if devices
            .iter()
            .any(|known| known.target == device.target && known.addr == device.addr)
        {
            continue;
        }
        info!(device = %device.target_hex(), %addr, port = device.port, "discovered device");
        devices.push(device);
    }

    Ok(devices)
}

fn device_from_reply(frame: &Frame, addr: SocketAddr, source: u32) -> Option<Device> {
    if frame.header.source != source {
        return None;
    }
    match frame.payload {
        Payload::StateService(state) => Some(Device {
            target: frame.header.target,
            addr,
            service: state.service,
            port: state.port,
        }),
        _ => None,
    }
}
