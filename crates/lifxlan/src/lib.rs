//! LIFX LAN protocol: byte-exact frames, discovery and light control.
//!
//! # Crate Structure
//!
//! - [`transport`]: UDP datagram endpoint and the `Datagram` seam
//! - [`frame`]: header and payload codec, bounded cursors, frame socket
//! - [`device`]: discovery, light client and a simulated light

/// Re-export transport types.
pub mod transport {
    pub use lifxlan_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use lifxlan_frame::*;
}

/// Re-export device types.
pub mod device {
    pub use lifxlan_device::*;
}
