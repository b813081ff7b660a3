use crate::message::MessageType;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A read or write would run past the end of the buffer.
    #[error("buffer overflow ({requested} bytes at offset {offset}, capacity {capacity})")]
    BufferOverflow {
        offset: usize,
        requested: usize,
        capacity: usize,
    },

    /// The declared frame size or the buffer is shorter than required.
    #[error("undersized frame ({size} bytes, need at least {required})")]
    UndersizedFrame { size: usize, required: usize },

    /// The message type code has no entry in the payload table.
    #[error("unsupported message type {0}")]
    UnsupportedMessageType(u16),

    /// The header's message type disagrees with the payload variant.
    #[error("header message type {message_type} does not match {payload} payload")]
    PayloadMismatch {
        message_type: u16,
        payload: MessageType,
    },

    /// Text does not fit its fixed-width wire field.
    #[error("text too long ({len} bytes, max {max})")]
    TextTooLong { len: usize, max: usize },

    /// An I/O error occurred while sending or receiving a frame.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Returns true if this error is a socket read timeout expiring.
    pub fn is_timeout(&self) -> bool {
        match self {
            FrameError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
