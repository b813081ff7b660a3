//! Bounds-checked little-endian cursors over fixed-capacity buffers.
//!
//! Every multi-byte field in a frame goes through [`WriteCursor::write`] or
//! [`ReadCursor::read`], so endianness and bounds checks live in one place.
//! A cursor never touches memory past its buffer; an out-of-range access
//! returns [`FrameError::BufferOverflow`] and leaves the position unchanged.

use bytes::{Buf, BufMut};

use crate::error::{FrameError, Result};

/// Widest integer a single `write`/`read` call moves.
const MAX_INT_WIDTH: usize = 8;

fn overflow(offset: usize, requested: usize, capacity: usize) -> FrameError {
    FrameError::BufferOverflow {
        offset,
        requested,
        capacity,
    }
}

/// Write position over a fixed-capacity byte buffer.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    /// Create a cursor at offset 0. Capacity is `buf.len()`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current write offset (bytes written so far).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total capacity of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes left before the cursor hits capacity.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn claim(&mut self, n: usize) -> Result<&mut [u8]> {
        let start = self.pos;
        let end = start
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| overflow(start, n, self.buf.len()))?;
        self.pos = end;
        Ok(&mut self.buf[start..end])
    }

    /// Write the low `n` bytes of `value` little-endian and advance.
    ///
    /// Returns the new position. Widths above 8 zero-fill the excess bytes.
    pub fn write(&mut self, n: usize, value: u64) -> Result<usize> {
        debug_assert!(n <= MAX_INT_WIDTH, "integer width {n} exceeds {MAX_INT_WIDTH}");
        let dst = self.claim(n)?;
        let (mut int, pad) = dst.split_at_mut(n.min(MAX_INT_WIDTH));
        let width = int.len();
        int.put_uint_le(value, width);
        pad.fill(0);
        Ok(self.pos)
    }

    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.write(1, u64::from(value)).map(drop)
    }

    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.write(2, u64::from(value)).map(drop)
    }

    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.write(4, u64::from(value)).map(drop)
    }

    pub fn put_u64(&mut self, value: u64) -> Result<()> {
        self.write(8, value).map(drop)
    }

    /// Copy `src` verbatim.
    pub fn put_slice(&mut self, src: &[u8]) -> Result<()> {
        self.claim(src.len())?.copy_from_slice(src);
        Ok(())
    }

    /// Write `n` zero bytes (reserved fields).
    pub fn put_zeros(&mut self, n: usize) -> Result<()> {
        self.claim(n)?.fill(0);
        Ok(())
    }
}

/// Read position over a fixed-length byte buffer.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor at offset 0. Capacity is `buf.len()`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let start = self.pos;
        let end = start
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| overflow(start, n, self.buf.len()))?;
        self.pos = end;
        Ok(&self.buf[start..end])
    }

    /// Read `n` bytes as a little-endian integer and advance.
    ///
    /// Widths above 8 read only the low 8 bytes.
    pub fn read(&mut self, n: usize) -> Result<u64> {
        debug_assert!(n <= MAX_INT_WIDTH, "integer width {n} exceeds {MAX_INT_WIDTH}");
        let src = self.take(n)?;
        let width = n.min(MAX_INT_WIDTH);
        let mut low = &src[..width];
        Ok(low.get_uint_le(width))
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        self.read(1).map(|v| v as u8)
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        self.read(2).map(|v| v as u16)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        self.read(4).map(|v| v as u32)
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        self.read(8)
    }

    /// Read exactly `N` bytes verbatim.
    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Consume `n` bytes without inspecting them (reserved fields).
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(drop)
    }
}
