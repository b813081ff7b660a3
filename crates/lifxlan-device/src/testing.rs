//! In-memory datagram endpoints for unit tests.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use lifxlan_frame::{decode_frame, encode_frame_to_bytes, Frame};
use lifxlan_transport::{Datagram, Result};

use crate::responder::SimulatedLight;

pub(crate) fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

enum Inbound {
    Datagram(Vec<u8>, SocketAddr),
    Error(io::ErrorKind),
}

/// Replays queued datagrams and receive errors, and records everything sent.
///
/// An empty inbox behaves like an expired read timeout.
pub(crate) struct ScriptedDatagram {
    local: SocketAddr,
    inbox: Mutex<VecDeque<Inbound>>,
    pub(crate) sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
}

impl ScriptedDatagram {
    pub(crate) fn new() -> Self {
        Self {
            local: addr("10.0.0.2:50000"),
            inbox: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_raw(&self, bytes: &[u8], from: SocketAddr) {
        self.inbox
            .lock()
            .unwrap()
            .push_back(Inbound::Datagram(bytes.to_vec(), from));
    }

    /// Make the next receive fail with `kind`.
    pub(crate) fn push_error(&self, kind: io::ErrorKind) {
        self.inbox.lock().unwrap().push_back(Inbound::Error(kind));
    }

    pub(crate) fn push_frame(&self, frame: &Frame, from: SocketAddr) {
        let bytes = encode_frame_to_bytes(frame).unwrap();
        self.push_raw(&bytes, from);
    }

    pub(crate) fn sent_frames(&self) -> Vec<(Frame, SocketAddr)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(bytes, to)| (decode_frame(bytes).unwrap(), *to))
            .collect()
    }
}

impl Datagram for ScriptedDatagram {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        self.sent.lock().unwrap().push((buf.to_vec(), addr));
        Ok(buf.len())
    }

    fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        match self.inbox.lock().unwrap().pop_front() {
            Some(Inbound::Datagram(bytes, from)) => {
                let len = bytes.len().min(buf.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                Ok((len, from))
            }
            Some(Inbound::Error(kind)) => Err(io::Error::from(kind).into()),
            None => Err(io::Error::from(io::ErrorKind::WouldBlock).into()),
        }
    }

    fn set_read_timeout(&self, _timeout: Option<Duration>) -> Result<()> {
        Ok(())
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.local)
    }
}

/// A datagram endpoint wired straight into a [`SimulatedLight`]: every
/// frame sent is handled and the replies are queued for receive.
pub(crate) struct LightLink {
    pub(crate) light: Mutex<SimulatedLight>,
    link: ScriptedDatagram,
    light_addr: SocketAddr,
}

impl LightLink {
    pub(crate) fn new(light: SimulatedLight, light_addr: SocketAddr) -> Self {
        Self {
            light: Mutex::new(light),
            link: ScriptedDatagram::new(),
            light_addr,
        }
    }
}

impl Datagram for LightLink {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize> {
        self.link.send_to(buf, addr)?;
        if addr == self.light_addr {
            if let Ok(request) = decode_frame(buf) {
                for reply in self.light.lock().unwrap().handle(&request) {
                    self.link.push_frame(&reply, self.light_addr);
                }
            }
        }
        Ok(buf.len())
    }

    fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.link.recv_from(buf)
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.link.set_read_timeout(timeout)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.link.local_addr()
    }
}
