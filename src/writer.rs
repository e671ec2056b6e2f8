//! Sequential writes into an auto-resizing output buffer.

use std::mem;

use crate::error::{Error, Result};
use crate::gap::Gap;
use crate::partial::{Encoded, Partial};

/// Growable output buffer.
///
/// Mirrors [`Reader`](crate::Reader) on the write side, and owns the
/// chunking mechanics behind partial encoding: [`Writer::chunk`] freezes the
/// bytes written so far against a gap, and [`Writer::output`] yields either
/// plain bytes or a [`Partial`] when any segments were frozen.
#[derive(Debug)]
pub struct Writer {
    buf: Vec<u8>,
    chunks: Vec<(Vec<u8>, Gap)>,
    partial: bool,
}

impl Writer {
    /// A fresh writer. `partial` opts into gap chunking; without it,
    /// [`Writer::chunk`] refuses to run.
    pub fn new(partial: bool) -> Self {
        Writer {
            buf: Vec::new(),
            chunks: Vec::new(),
            partial,
        }
    }

    /// Reserve room for `n` more bytes, doubling the backing buffer as
    /// needed. Previously written bytes are preserved.
    pub fn claim(&mut self, n: usize) {
        self.buf.reserve(n);
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append raw bytes. Writing an empty range is a no-op.
    pub fn bytes(&mut self, b: &[u8]) {
        if b.is_empty() {
            return;
        }
        self.claim(b.len());
        self.buf.extend_from_slice(b);
    }

    /// Write a major-type header in the canonical shortest form: arguments
    /// below 24 inline in the info field, then the 1/2/4/8-byte big-endian
    /// tiers behind info 24/25/26/27.
    pub fn head(&mut self, major: u8, arg: u64) {
        if arg < 24 {
            self.u8(major << 5 | arg as u8);
        } else if arg < 256 {
            self.u8(major << 5 | 24);
            self.u8(arg as u8);
        } else if arg < 65536 {
            self.u8(major << 5 | 25);
            self.u16(arg as u16);
        } else if arg < 4294967296 {
            self.u8(major << 5 | 26);
            self.u32(arg as u32);
        } else {
            self.u8(major << 5 | 27);
            self.u64(arg);
        }
    }

    /// Freeze everything written since the last chunk as a segment bound to
    /// `gap`, then reset the live buffer for the next segment.
    pub fn chunk(&mut self, gap: Gap) -> Result<()> {
        if !self.partial {
            return Err(Error::PartialDisabled { gap: gap.id() });
        }
        self.chunks.push((mem::take(&mut self.buf), gap));
        Ok(())
    }

    /// Finish writing: plain bytes when no segments were frozen, otherwise
    /// the ordered segment list plus the trailing bytes as a [`Partial`].
    pub fn output(self) -> Encoded {
        if self.chunks.is_empty() {
            Encoded::Bytes(self.buf)
        } else {
            Encoded::Partial(Partial {
                segments: self.chunks,
                trailer: self.buf,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_bytes(major: u8, arg: u64) -> Vec<u8> {
        let mut w = Writer::new(false);
        w.head(major, arg);
        match w.output() {
            Encoded::Bytes(b) => b,
            Encoded::Partial(_) => unreachable!(),
        }
    }

    #[test]
    fn head_tier_boundaries() {
        assert_eq!(head_bytes(0, 0), vec![0x00]);
        assert_eq!(head_bytes(0, 23), vec![0x17]);
        assert_eq!(head_bytes(0, 24), vec![0x18, 24]);
        assert_eq!(head_bytes(0, 255), vec![0x18, 255]);
        assert_eq!(head_bytes(0, 256), vec![0x19, 0x01, 0x00]);
        assert_eq!(head_bytes(0, 65535), vec![0x19, 0xff, 0xff]);
        assert_eq!(head_bytes(0, 65536), vec![0x1a, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(head_bytes(0, u64::from(u32::MAX)), vec![0x1a, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            head_bytes(0, u64::from(u32::MAX) + 1),
            vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn empty_write_is_noop() {
        let mut w = Writer::new(false);
        w.bytes(&[]);
        assert_eq!(w.output(), Encoded::Bytes(Vec::new()));
    }

    #[test]
    fn chunk_requires_partial_mode() {
        let gap = Gap::new();
        let mut w = Writer::new(false);
        w.u8(0x01);
        match w.chunk(gap.clone()) {
            Err(Error::PartialDisabled { gap: id }) => assert_eq!(id, gap.id()),
            other => panic!("expected partial-disabled, got {other:?}"),
        }
    }

    #[test]
    fn chunks_split_output_into_segments() {
        let gap = Gap::new();
        let mut w = Writer::new(true);
        w.u8(0x01);
        w.chunk(gap.clone()).unwrap();
        w.u8(0x02);
        match w.output() {
            Encoded::Partial(partial) => {
                assert_eq!(partial.segments, vec![(vec![0x01], gap)]);
                assert_eq!(partial.trailer, vec![0x02]);
            }
            Encoded::Bytes(_) => panic!("expected partial output"),
        }
    }
}
