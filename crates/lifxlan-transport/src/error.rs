use std::net::SocketAddr;

/// Errors that can occur in UDP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to apply a socket option.
    #[error("failed to set {option}: {source}")]
    Configure {
        option: &'static str,
        source: std::io::Error,
    },

    /// An I/O error occurred while sending or receiving a datagram.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Returns true if this error is a read timeout expiring.
    ///
    /// Unix reports an expired `SO_RCVTIMEO` as `WouldBlock`, Windows as `TimedOut`.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_and_timed_out_are_timeouts() {
        let would_block = TransportError::Io(std::io::ErrorKind::WouldBlock.into());
        let timed_out = TransportError::Io(std::io::ErrorKind::TimedOut.into());
        assert!(would_block.is_timeout());
        assert!(timed_out.is_timeout());
    }

    #[test]
    fn other_errors_are_not_timeouts() {
        let refused = TransportError::Io(std::io::ErrorKind::ConnectionRefused.into());
        let configure = TransportError::Configure {
            option: "SO_BROADCAST",
            source: std::io::ErrorKind::WouldBlock.into(),
        };
        assert!(!refused.is_timeout());
        assert!(!configure.is_timeout());
    }
}
