use lifxlan_frame::MessageType;

/// Errors that can occur while talking to devices.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] lifxlan_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] lifxlan_frame::FrameError),

    /// No matching reply arrived in time.
    #[error("no reply after {0:?}")]
    Timeout(std::time::Duration),

    /// A correlated reply carried the wrong message type.
    #[error("expected {expected} reply, got message type {actual}")]
    UnexpectedResponse { expected: MessageType, actual: u16 },

    /// A device target could not be parsed.
    #[error("invalid target {0:?} (expected 12 or 16 hex digits)")]
    InvalidTarget(String),
}

impl DeviceError {
    pub fn is_timeout(&self) -> bool {
        match self {
            DeviceError::Timeout(_) => true,
            DeviceError::Frame(err) => err.is_timeout(),
            DeviceError::Transport(err) => err.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
