//! Bounded text for fixed-width wire fields.

use std::fmt;

use crate::error::{FrameError, Result};

/// Up to `N` bytes of text with an explicit length.
///
/// On the wire the field is always `N` bytes, zero-padded. The decoded value
/// stops at the first NUL, so a full field of `N` non-NUL bytes is still
/// bounded. Bytes past `len` are always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Text<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> Text<N> {
    /// Maximum length in bytes.
    pub const CAPACITY: usize = N;

    /// Build from a raw wire field, stopping at the first NUL.
    pub fn from_wire(field: &[u8; N]) -> Self {
        let len = field.iter().position(|b| *b == 0).unwrap_or(N);
        let mut bytes = [0u8; N];
        bytes[..len].copy_from_slice(&field[..len]);
        Self { bytes, len }
    }

    /// Build from arbitrary bytes.
    ///
    /// Anything after an embedded NUL is dropped, matching what a decoder
    /// would see. Fails if the text before the NUL exceeds `N` bytes.
    pub fn from_bytes(src: &[u8]) -> Result<Self> {
        let len = src.iter().position(|b| *b == 0).unwrap_or(src.len());
        if len > N {
            return Err(FrameError::TextTooLong { len, max: N });
        }
        let mut bytes = [0u8; N];
        bytes[..len].copy_from_slice(&src[..len]);
        Ok(Self { bytes, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full zero-padded wire field.
    pub fn wire_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl<const N: usize> Default for Text<N> {
    fn default() -> Self {
        Self {
            bytes: [0u8; N],
            len: 0,
        }
    }
}

impl<const N: usize> TryFrom<&str> for Text<N> {
    type Error = FrameError;

    fn try_from(value: &str) -> Result<Self> {
        Self::from_bytes(value.as_bytes())
    }
}

impl<const N: usize> fmt::Display for Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<const N: usize> fmt::Debug for Text<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Text")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
