use bytes::{Bytes, BytesMut};

use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{FrameError, Result};
use crate::header::{decode_header, encode_header, Header};
use crate::message::{MessageType, HEADER_SIZE};
use crate::payload::{decode_payload, encode_payload, Payload};

/// One complete protocol message: header plus payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    pub header: Header,
    pub payload: Payload,
}

impl Frame {
    /// Create a frame, stamping the header's message type and size from
    /// the payload.
    pub fn new(mut header: Header, payload: Payload) -> Self {
        header.message_type = payload.message_type().code();
        header.size = (HEADER_SIZE + payload.wire_len()) as u16;
        Self { header, payload }
    }

    /// Header plus payload length on the wire.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.wire_len()
    }

    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }
}

/// Encode a frame into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least `header.size` bytes, and nothing is written past
/// `header.size`: a declared size too small for the payload fails with
/// [`FrameError::BufferOverflow`]. Bytes of `dst` beyond the returned length
/// are left untouched.
///
/// ```text
/// ┌───────────────────────────────┬──────────────────────────────┐
/// │ Header (36B)                  │ Payload (0-64B, by type)     │
/// │ size|proto|source|target|...  │                              │
/// └───────────────────────────────┴──────────────────────────────┘
/// ```
pub fn encode_frame(frame: &Frame, dst: &mut [u8]) -> Result<usize> {
    let size = usize::from(frame.header.size);
    if size < HEADER_SIZE {
        return Err(FrameError::UndersizedFrame {
            size,
            required: HEADER_SIZE,
        });
    }
    if dst.len() < size {
        return Err(FrameError::UndersizedFrame {
            size: dst.len(),
            required: size,
        });
    }

    let message_type = MessageType::try_from(frame.header.message_type)?;
    if frame.payload.message_type() != message_type {
        return Err(FrameError::PayloadMismatch {
            message_type: frame.header.message_type,
            payload: frame.payload.message_type(),
        });
    }

    let mut cursor = WriteCursor::new(&mut dst[..size]);
    encode_header(&frame.header, &mut cursor)?;
    encode_payload(message_type, &frame.payload, &mut cursor)?;
    Ok(cursor.position())
}

/// Encode a frame into a freshly allocated buffer of exactly the encoded length.
pub fn encode_frame_to_bytes(frame: &Frame) -> Result<Bytes> {
    let mut buf = BytesMut::zeroed(usize::from(frame.header.size));
    let len = encode_frame(frame, &mut buf)?;
    buf.truncate(len);
    Ok(buf.freeze())
}

/// Decode one frame from `src`.
///
/// `src` is exactly the received datagram; its length bounds every read.
/// Buffers shorter than a header fail before any field is read, and the
/// header's type code alone selects the payload decoder.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    if src.len() < HEADER_SIZE {
        return Err(FrameError::UndersizedFrame {
            size: src.len(),
            required: HEADER_SIZE,
        });
    }

    let mut cursor = ReadCursor::new(src);
    let header = decode_header(&mut cursor)?;
    let message_type = MessageType::try_from(header.message_type)?;
    let payload = decode_payload(message_type, &mut cursor)?;

    Ok(Frame { header, payload })
}
