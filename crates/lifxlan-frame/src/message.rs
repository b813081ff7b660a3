//! Message type table and protocol-wide constants.
//!
//! The message type code in the header is the only thing that selects a
//! payload layout. Codes without an entry here are rejected, never guessed
//! from the datagram length.

use std::fmt;

use crate::error::FrameError;

/// Fixed header length on the wire.
pub const HEADER_SIZE: usize = 36;

/// Well-known LIFX LAN UDP port.
pub const DEFAULT_PORT: u16 = 56700;

/// Receive buffer size. Larger than any frame this codec produces.
pub const FRAME_SIZE_MAX: usize = 1024;

/// Supported message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    GetService = 2,
    StateService = 3,
    SetPower = 21,
    GetLabel = 23,
    StateLabel = 25,
    Acknowledgement = 45,
    EchoRequest = 58,
    EchoResponse = 59,
    SetColor = 102,
}

impl MessageType {
    /// All supported types, in code order.
    pub const ALL: [MessageType; 9] = [
        MessageType::GetService,
        MessageType::StateService,
        MessageType::SetPower,
        MessageType::GetLabel,
        MessageType::StateLabel,
        MessageType::Acknowledgement,
        MessageType::EchoRequest,
        MessageType::EchoResponse,
        MessageType::SetColor,
    ];

    /// Wire code carried in the header's type field.
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::GetService => "GetService",
            MessageType::StateService => "StateService",
            MessageType::SetPower => "SetPower",
            MessageType::GetLabel => "GetLabel",
            MessageType::StateLabel => "StateLabel",
            MessageType::Acknowledgement => "Acknowledgement",
            MessageType::EchoRequest => "EchoRequest",
            MessageType::EchoResponse => "EchoResponse",
            MessageType::SetColor => "SetColor",
        }
    }

    /// Payload length in bytes following the header.
    pub fn payload_len(self) -> usize {
        match self {
            MessageType::GetService | MessageType::GetLabel | MessageType::Acknowledgement => 0,
            MessageType::StateService => 5,
            MessageType::SetPower => 2,
            MessageType::StateLabel => crate::payload::LABEL_LEN,
            MessageType::EchoRequest | MessageType::EchoResponse => crate::payload::ECHO_LEN,
            // reserved byte + 4 x u16 + u32
            MessageType::SetColor => 13,
        }
    }

    /// Total frame length for this type: header plus payload.
    pub fn frame_len(self) -> usize {
        HEADER_SIZE + self.payload_len()
    }
}

impl TryFrom<u16> for MessageType {
    type Error = FrameError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        MessageType::ALL
            .into_iter()
            .find(|ty| ty.code() == code)
            .ok_or(FrameError::UnsupportedMessageType(code))
    }
}

impl From<MessageType> for u16 {
    fn from(ty: MessageType) -> Self {
        ty.code()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}
