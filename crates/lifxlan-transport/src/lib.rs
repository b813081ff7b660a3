//! UDP datagram transport for the LIFX LAN protocol.
//!
//! LIFX devices speak one frame per UDP datagram on port 56700. This crate
//! owns socket setup (bind, broadcast, read timeouts) and exposes the
//! [`Datagram`] trait that every higher layer sends and receives through.
//!
//! This is the lowest layer of lifxlan. It knows nothing about frames.

pub mod error;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use traits::Datagram;
pub use udp::UdpTransport;
