//! Typed payloads and the per-type encode/decode table.

use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{FrameError, Result};
use crate::message::MessageType;
use crate::text::Text;

/// Width of the StateLabel label field.
pub const LABEL_LEN: usize = 32;

/// Width of the EchoRequest/EchoResponse field.
pub const ECHO_LEN: usize = 64;

/// Device label as carried by StateLabel.
pub type Label = Text<LABEL_LEN>;

/// Echoed text as carried by EchoResponse.
pub type EchoText = Text<ECHO_LEN>;

/// Transport a device offers for further communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Udp,
    /// Codes 2 through 5.
    Reserved(u8),
    Unknown(u8),
}

impl From<u8> for Service {
    fn from(code: u8) -> Self {
        match code {
            1 => Service::Udp,
            2..=5 => Service::Reserved(code),
            other => Service::Unknown(other),
        }
    }
}

impl From<Service> for u8 {
    fn from(service: Service) -> Self {
        match service {
            Service::Udp => 1,
            Service::Reserved(code) | Service::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateService {
    pub service: Service,
    pub port: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SetPower {
    pub level: u16,
}

/// HSBK color plus transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SetColor {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
    /// Transition time in milliseconds.
    pub duration: u32,
}

/// Caller-supplied echo content, sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EchoRequest {
    pub echoing: [u8; ECHO_LEN],
}

impl EchoRequest {
    /// Zero-pad `src` into the 64-byte field.
    pub fn from_bytes(src: &[u8]) -> Result<Self> {
        if src.len() > ECHO_LEN {
            return Err(FrameError::TextTooLong {
                len: src.len(),
                max: ECHO_LEN,
            });
        }
        let mut echoing = [0u8; ECHO_LEN];
        echoing[..src.len()].copy_from_slice(src);
        Ok(Self { echoing })
    }
}

impl Default for EchoRequest {
    fn default() -> Self {
        Self {
            echoing: [0; ECHO_LEN],
        }
    }
}

/// Frame payload. The variant always agrees with the header's message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payload {
    GetService,
    StateService(StateService),
    SetPower(SetPower),
    GetLabel,
    StateLabel(Label),
    Acknowledgement,
    EchoRequest(EchoRequest),
    EchoResponse(EchoText),
    SetColor(SetColor),
}

impl Payload {
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::GetService => MessageType::GetService,
            Payload::StateService(_) => MessageType::StateService,
            Payload::SetPower(_) => MessageType::SetPower,
            Payload::GetLabel => MessageType::GetLabel,
            Payload::StateLabel(_) => MessageType::StateLabel,
            Payload::Acknowledgement => MessageType::Acknowledgement,
            Payload::EchoRequest(_) => MessageType::EchoRequest,
            Payload::EchoResponse(_) => MessageType::EchoResponse,
            Payload::SetColor(_) => MessageType::SetColor,
        }
    }

    /// Payload length on the wire.
    pub fn wire_len(&self) -> usize {
        self.message_type().payload_len()
    }
}

/// Encode `payload` as message type `ty`.
///
/// The payload variant must match `ty`; otherwise nothing is written and
/// [`FrameError::PayloadMismatch`] is returned.
pub fn encode_payload(
    ty: MessageType,
    payload: &Payload,
    cursor: &mut WriteCursor<'_>,
) -> Result<()> {
    match (ty, payload) {
        (MessageType::GetService, Payload::GetService)
        | (MessageType::GetLabel, Payload::GetLabel)
        | (MessageType::Acknowledgement, Payload::Acknowledgement) => Ok(()),
        (MessageType::StateService, Payload::StateService(state)) => {
            cursor.put_u8(state.service.into())?;
            cursor.put_u32(state.port)
        }
        (MessageType::SetPower, Payload::SetPower(power)) => cursor.put_u16(power.level),
        (MessageType::StateLabel, Payload::StateLabel(label)) => {
            cursor.put_slice(label.wire_bytes())
        }
        (MessageType::EchoRequest, Payload::EchoRequest(echo)) => cursor.put_slice(&echo.echoing),
        (MessageType::EchoResponse, Payload::EchoResponse(text)) => {
            cursor.put_slice(text.wire_bytes())
        }
        (MessageType::SetColor, Payload::SetColor(color)) => {
            cursor.put_zeros(1)?;
            cursor.put_u16(color.hue)?;
            cursor.put_u16(color.saturation)?;
            cursor.put_u16(color.brightness)?;
            cursor.put_u16(color.kelvin)?;
            cursor.put_u32(color.duration)
        }
        (ty, payload) => Err(FrameError::PayloadMismatch {
            message_type: ty.code(),
            payload: payload.message_type(),
        }),
    }
}

/// Decode the payload for message type `ty`.
pub fn decode_payload(ty: MessageType, cursor: &mut ReadCursor<'_>) -> Result<Payload> {
    let payload = match ty {
        MessageType::GetService => Payload::GetService,
        MessageType::GetLabel => Payload::GetLabel,
        MessageType::Acknowledgement => Payload::Acknowledgement,
        MessageType::StateService => Payload::StateService(StateService {
            service: Service::from(cursor.get_u8()?),
            port: cursor.get_u32()?,
        }),
        MessageType::SetPower => Payload::SetPower(SetPower {
            level: cursor.get_u16()?,
        }),
        MessageType::StateLabel => {
            Payload::StateLabel(Text::from_wire(&cursor.get_array::<LABEL_LEN>()?))
        }
        MessageType::EchoRequest => Payload::EchoRequest(EchoRequest {
            echoing: cursor.get_array::<ECHO_LEN>()?,
        }),
        MessageType::EchoResponse => {
            Payload::EchoResponse(Text::from_wire(&cursor.get_array::<ECHO_LEN>()?))
        }
        MessageType::SetColor => {
            cursor.skip(1)?;
            Payload::SetColor(SetColor {
                hue: cursor.get_u16()?,
                saturation: cursor.get_u16()?,
                brightness: cursor.get_u16()?,
                kelvin: cursor.get_u16()?,
                duration: cursor.get_u32()?,
            })
        }
    };
    Ok(payload)
}
