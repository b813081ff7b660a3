//! The fixed 36-byte frame header.
//!
//! Wire layout (all integers little-endian):
//! ```text
//! offset  size  field
//!      0     2  size            total frame length
//!      2     2  protocol word   bits 0-11 protocol (1024), 12 addressable,
//!                               13 tagged, 14-15 origin (0)
//!      4     4  source
//!      8     8  target
//!     16     6  reserved
//!     22     1  flags           bit 0 res_required, bit 1 ack_required
//!     23     1  sequence
//!     24     8  reserved
//!     32     2  message type
//!     34     2  reserved
//! ```

use tracing::trace;

use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{FrameError, Result};
use crate::message::HEADER_SIZE;

/// Protocol number carried in the low 12 bits of the protocol word.
pub const PROTOCOL: u16 = 1024;

const PROTOCOL_MASK: u16 = 0x0FFF;
const ADDRESSABLE_BIT: u16 = 1 << 12;
const TAGGED_BIT: u16 = 1 << 13;
const ORIGIN_SHIFT: u32 = 14;
const ORIGIN: u16 = 0;

const RES_REQUIRED_BIT: u8 = 1 << 0;
const ACK_REQUIRED_BIT: u8 = 1 << 1;

const FRAME_ADDRESS_RESERVED: usize = 6;
const PROTOCOL_HEADER_RESERVED: usize = 8;
const TRAILING_RESERVED: usize = 2;

/// Decoded frame header.
///
/// The protocol number, addressable bit and origin are protocol constants;
/// they are written on encode and not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    /// Total frame length in bytes, header included.
    pub size: u16,
    /// Addressed to all devices (discovery) rather than `target`.
    pub tagged: bool,
    /// Client-chosen correlation id, echoed by responders.
    pub source: u32,
    /// Device identifier (MAC in the first 6 bytes), all-zero when tagged.
    pub target: [u8; 8],
    /// Ask for a state reply.
    pub res_required: bool,
    /// Ask for an Acknowledgement reply.
    pub ack_required: bool,
    /// Client-chosen sequence number, echoed by responders.
    pub sequence: u8,
    /// Raw message type code. Selects the payload layout.
    pub message_type: u16,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            size: HEADER_SIZE as u16,
            tagged: false,
            source: 0,
            target: [0; 8],
            res_required: false,
            ack_required: false,
            sequence: 0,
            message_type: 0,
        }
    }
}

impl Header {
    /// A tagged header addressed to every device.
    pub fn broadcast(source: u32, sequence: u8) -> Self {
        Self {
            tagged: true,
            source,
            sequence,
            ..Self::default()
        }
    }

    /// A header addressed to a single device.
    pub fn to_target(target: [u8; 8], source: u32, sequence: u8) -> Self {
        Self {
            target,
            source,
            sequence,
            ..Self::default()
        }
    }

    /// The 16-bit protocol word as it appears on the wire.
    pub fn protocol_word(&self) -> u16 {
        let mut word = PROTOCOL & PROTOCOL_MASK;
        word |= ADDRESSABLE_BIT;
        if self.tagged {
            word |= TAGGED_BIT;
        }
        word | (ORIGIN << ORIGIN_SHIFT)
    }

    /// The flag byte: only bits 0 and 1 are ever set.
    pub fn flags_byte(&self) -> u8 {
        let mut flags = 0u8;
        if self.res_required {
            flags |= RES_REQUIRED_BIT;
        }
        if self.ack_required {
            flags |= ACK_REQUIRED_BIT;
        }
        flags
    }

    /// Encode into a standalone 36-byte array.
    pub fn encode(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut out = [0u8; HEADER_SIZE];
        encode_header(self, &mut WriteCursor::new(&mut out))?;
        Ok(out)
    }

    /// Decode the first 36 bytes of `src`.
    pub fn decode(src: &[u8]) -> Result<Self> {
        decode_header(&mut ReadCursor::new(src))
    }
}

/// Write the 36-byte header at the cursor.
///
/// Fails with [`FrameError::UndersizedFrame`] if `header.size` is below 36:
/// a frame cannot be shorter than its own header.
pub fn encode_header(header: &Header, cursor: &mut WriteCursor<'_>) -> Result<()> {
    if usize::from(header.size) < HEADER_SIZE {
        return Err(FrameError::UndersizedFrame {
            size: usize::from(header.size),
            required: HEADER_SIZE,
        });
    }

    // Frame header
    cursor.put_u16(header.size)?;
    cursor.put_u16(header.protocol_word())?;
    cursor.put_u32(header.source)?;

    // Frame address
    cursor.put_slice(&header.target)?;
    cursor.put_zeros(FRAME_ADDRESS_RESERVED)?;
    cursor.put_u8(header.flags_byte())?;
    cursor.put_u8(header.sequence)?;

    // Protocol header
    cursor.put_zeros(PROTOCOL_HEADER_RESERVED)?;
    cursor.put_u16(header.message_type)?;
    cursor.put_zeros(TRAILING_RESERVED)?;

    Ok(())
}

/// Read a 36-byte header at the cursor.
///
/// Reserved regions are consumed without validation. The protocol number,
/// addressable bit and origin are not checked either; a non-standard
/// protocol number is only traced.
pub fn decode_header(cursor: &mut ReadCursor<'_>) -> Result<Header> {
    let size = cursor.get_u16()?;
    let protocol_word = cursor.get_u16()?;
    let source = cursor.get_u32()?;

    let target = cursor.get_array::<8>()?;
    cursor.skip(FRAME_ADDRESS_RESERVED)?;
    let flags = cursor.get_u8()?;
    let sequence = cursor.get_u8()?;

    cursor.skip(PROTOCOL_HEADER_RESERVED)?;
    let message_type = cursor.get_u16()?;
    cursor.skip(TRAILING_RESERVED)?;

    let protocol = protocol_word & PROTOCOL_MASK;
    if protocol != PROTOCOL {
        trace!(protocol, "non-standard protocol number");
    }

    Ok(Header {
        size,
        tagged: protocol_word & TAGGED_BIT != 0,
        source,
        target,
        res_required: flags & RES_REQUIRED_BIT != 0,
        ack_required: flags & ACK_REQUIRED_BIT != 0,
        sequence,
        message_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: [u8; 8] = [0xD0, 0x73, 0xD5, 0x30, 0x9D, 0x57, 0, 0];

    fn sample() -> Header {
        Header {
            size: 49,
            tagged: false,
            source: 1234,
            target: LIGHT,
            res_required: false,
            ack_required: true,
            sequence: 1,
            message_type: 102,
        }
    }

    #[test]
    fn encode_layout_is_byte_exact() {
        let bytes = sample().encode().unwrap();
        assert_eq!(&bytes[0..2], &[0x31, 0x00]);
        // 1024 | addressable
        assert_eq!(&bytes[2..4], &[0x00, 0x14]);
        assert_eq!(&bytes[4..8], &1234u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &LIGHT);
        assert_eq!(&bytes[16..22], &[0; 6]);
        assert_eq!(bytes[22], 0b10);
        assert_eq!(bytes[23], 1);
        assert_eq!(&bytes[24..32], &[0; 8]);
        assert_eq!(&bytes[32..34], &[102, 0]);
        assert_eq!(&bytes[34..36], &[0, 0]);
    }

    #[test]
    fn tagged_ack_bits_are_exact() {
        let header = Header {
            tagged: true,
            res_required: false,
            ack_required: true,
            ..Header::default()
        };
        let word = header.protocol_word();
        assert_eq!(word & 0x0FFF, 1024);
        assert_ne!(word & (1 << 12), 0);
        assert_ne!(word & (1 << 13), 0);
        assert_eq!(word & (1 << 14), 0);
        assert_eq!(header.flags_byte(), 0b10);

        let decoded = Header::decode(&header.encode().unwrap()).unwrap();
        assert!(decoded.tagged);
        assert!(!decoded.res_required);
        assert!(decoded.ack_required);
    }

    #[test]
    fn response_flag_alone_sets_bit_zero() {
        let header = Header {
            res_required: true,
            ..Header::default()
        };
        let bytes = header.encode().unwrap();
        assert_eq!(bytes[22], 0b01);
        let decoded = Header::decode(&bytes).unwrap();
        assert!(decoded.res_required);
        assert!(!decoded.ack_required);
    }

    #[test]
    fn decode_round_trips_every_field() {
        let header = Header {
            size: 0xFFFF,
            tagged: true,
            source: u32::MAX,
            target: [1, 2, 3, 4, 5, 6, 7, 8],
            res_required: true,
            ack_required: true,
            sequence: 255,
            message_type: 58,
        };
        assert_eq!(Header::decode(&header.encode().unwrap()).unwrap(), header);
    }

    #[test]
    fn decode_ignores_reserved_bytes_and_unused_flag_bits() {
        let mut bytes = sample().encode().unwrap();
        bytes[16..22].fill(0xEE);
        bytes[24..32].fill(0xEE);
        bytes[34..36].fill(0xEE);
        bytes[22] |= 0b1111_1100;
        assert_eq!(Header::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn decode_tolerates_foreign_protocol_number() {
        let mut bytes = sample().encode().unwrap();
        bytes[2] = 0x01;
        let decoded = Header::decode(&bytes).unwrap();
        assert_eq!(decoded.source, 1234);
    }

    #[test]
    fn encode_rejects_size_below_header() {
        let header = Header {
            size: 35,
            ..Header::default()
        };
        let err = header.encode().unwrap_err();
        assert!(matches!(
            err,
            FrameError::UndersizedFrame {
                size: 35,
                required: 36
            }
        ));
    }

    #[test]
    fn decode_short_buffer_overflows() {
        let bytes = sample().encode().unwrap();
        let err = Header::decode(&bytes[..30]).unwrap_err();
        assert!(matches!(err, FrameError::BufferOverflow { .. }));
    }

    #[test]
    fn constructors() {
        let broadcast = Header::broadcast(7, 9);
        assert!(broadcast.tagged);
        assert_eq!(broadcast.target, [0; 8]);
        assert_eq!(broadcast.size, 36);

        let unicast = Header::to_target(LIGHT, 7, 9);
        assert!(!unicast.tagged);
        assert_eq!(unicast.target, LIGHT);
        assert_eq!((unicast.source, unicast.sequence), (7, 9));
    }
}
