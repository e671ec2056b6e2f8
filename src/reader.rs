//! Sequential, position-tracking reads over a borrowed byte buffer.

use crate::error::{Error, Result};

/// Byte cursor over an input buffer.
///
/// All multi-byte reads are big-endian. A read past the end of the buffer
/// fails with [`Error::Range`] carrying the requested and available lengths;
/// the cursor has no other side effect than advancing its offset.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::Range {
                offset: self.pos,
                requested: n,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// Read a half-precision float, widened to f64.
    pub fn f16(&mut self) -> Result<f64> {
        Ok(f64::from(half::f16::from_be_bytes(self.array()?)))
    }

    /// Read a single-precision float, widened to f64.
    pub fn f32(&mut self) -> Result<f64> {
        Ok(f64::from(f32::from_be_bytes(self.array()?)))
    }

    pub fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    /// Read `n` raw bytes.
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Look at the next byte without advancing.
    pub fn peek(&self) -> Result<u8> {
        if self.remaining() == 0 {
            return Err(Error::Range {
                offset: self.pos,
                requested: 1,
                available: 0,
            });
        }
        Ok(self.buf[self.pos])
    }

    /// Skip `n` bytes.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read the 1-byte header and split it into (major type, additional info).
    pub fn header(&mut self) -> Result<(u8, u8)> {
        let byte = self.u8()?;
        Ok((byte >> 5, byte & 0x1f))
    }

    /// Decode the header argument for the given additional-info field:
    /// 0-23 inline, 24/25/26/27 followed by that many big-endian bytes.
    /// Any other info value has no interpretation here and fails with
    /// [`Error::InvalidMajor`]; indefinite-length (31) is handled by the
    /// decoder before calling this.
    pub fn arg(&mut self, major: u8, info: u8) -> Result<u64> {
        Ok(match info {
            0..=23 => u64::from(info),
            24 => u64::from(self.u8()?),
            25 => u64::from(self.u16()?),
            26 => u64::from(self.u32()?),
            27 => self.u64()?,
            _ => {
                return Err(Error::InvalidMajor {
                    byte: (major << 5) | info,
                    offset: self.pos.saturating_sub(1),
                });
            }
        })
    }
}
