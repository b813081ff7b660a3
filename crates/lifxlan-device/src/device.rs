use std::net::SocketAddr;

use lifxlan_frame::Service;

use crate::error::{DeviceError, Result};

/// A device that answered discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    /// Device identifier from the reply header.
    pub target: [u8; 8],
    /// Address the reply came from.
    pub addr: SocketAddr,
    /// Advertised service.
    pub service: Service,
    /// Advertised service port.
    pub port: u32,
}

impl Device {
    pub fn target_hex(&self) -> String {
        format_target(&self.target)
    }

    /// Where to send further requests: the reply address with the
    /// advertised port, falling back to the reply port if it is out of range.
    pub fn service_addr(&self) -> SocketAddr {
        match u16::try_from(self.port) {
            Ok(port) if port != 0 => SocketAddr::new(self.addr.ip(), port),
            _ => self.addr,
        }
    }
}

/// Lowercase hex, 16 digits.
pub fn format_target(target: &[u8; 8]) -> String {
    hex::encode(target)
}

/// Parse a target from 12 (MAC only) or 16 hex digits.
///
/// `:` and `-` separators are accepted; a 6-byte MAC is zero-padded to 8.
pub fn parse_target(input: &str) -> Result<[u8; 8]> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| *b != b':' && *b != b'-')
        .collect();
    if digits.len() != 12 && digits.len() != 16 {
        return Err(DeviceError::InvalidTarget(input.to_string()));
    }

    let mut target = [0u8; 8];
    hex::decode_to_slice(&digits, &mut target[..digits.len() / 2])
        .map_err(|_| DeviceError::InvalidTarget(input.to_string()))?;
    Ok(target)
}
