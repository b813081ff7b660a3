//! Byte-exact codec for the LIFX LAN wire protocol.
//!
//! This is the core of lifxlan. Every frame on the wire is:
//! - A fixed 36-byte header (size, protocol word with packed flags, source,
//!   target, ack/response flag byte, sequence, message type)
//! - A payload whose layout is selected solely by the header's message type
//!
//! All multi-byte fields are little-endian. Encoding writes into a
//! caller-supplied buffer and never allocates; decoding never panics on
//! malformed input.

pub mod codec;
pub mod cursor;
pub mod error;
pub mod header;
pub mod message;
pub mod payload;
pub mod socket;
pub mod text;

pub use bytes::Bytes;
pub use codec::{decode_frame, encode_frame, encode_frame_to_bytes, Frame};
pub use cursor::{ReadCursor, WriteCursor};
pub use error::{FrameError, Result};
pub use header::{decode_header, encode_header, Header, PROTOCOL};
pub use message::{MessageType, DEFAULT_PORT, FRAME_SIZE_MAX, HEADER_SIZE};
pub use payload::{
    decode_payload, encode_payload, EchoRequest, EchoText, Label, Payload, Service, SetColor,
    SetPower, StateService, ECHO_LEN, LABEL_LEN,
};
pub use socket::FrameSocket;
pub use text::Text;
