//! Talking to LIFX devices on the local network.
//!
//! This is the "just works" layer on top of the frame codec: broadcast
//! discovery, a client that addresses one light, and a simulated light that
//! answers the same requests a real bulb would.

pub mod client;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod responder;

#[cfg(test)]
pub(crate) mod testing;

pub use client::LightClient;
pub use config::LanConfig;
pub use device::{format_target, parse_target, Device};
pub use discovery::discover;
pub use error::{DeviceError, Result};
pub use responder::{serve, SimulatedLight};
