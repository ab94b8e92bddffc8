//! A positioned, optionally growing byte buffer with endian-aware typed
//! accessors. The decoder runs on a fixed wrap of the input, the encoder on
//! an expandable scratch buffer, so both halves of the codec share one
//! buffer type.

use std::convert::TryFrom;
use std::io::SeekFrom;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Byte order used for every multi-byte read and write of a stream. On-disk
/// NBT is big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// The smallest capacity an expandable stream grows to, matching the usual
/// growable-buffer convention.
const MIN_GROWTH: usize = 256;

/// A seekable byte buffer.
///
/// Streams come in two flavours. An expandable stream starts empty and grows
/// its capacity as writes land past the end. A wrapping stream is a fixed
/// window `[index, index + count)` over a caller-supplied buffer and fails
/// with an end-of-stream error rather than grow.
///
/// Positions, lengths and capacities exposed here are relative to the
/// stream's origin, so a wrapped sub-range behaves like a buffer of its own.
/// The position may be moved past the logical length; reads from there fail,
/// while writes zero-fill the gap.
///
/// ```
/// use nbtree::stream::{ByteStream, Endian};
///
/// let mut s = ByteStream::with_endian(Endian::Big);
/// s.write_i32(42).unwrap();
/// s.set_position(0).unwrap();
/// assert_eq!(s.read_i32().unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct ByteStream {
    buf: Vec<u8>,
    origin: usize,
    len: usize,
    pos: usize,
    endian: Endian,
    expandable: bool,
}

impl ByteStream {
    /// An empty, expandable stream with the process-default endianness.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// An empty, expandable stream with an initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            origin: 0,
            len: 0,
            pos: 0,
            endian: crate::default_endian(),
            expandable: true,
        }
    }

    /// An empty, expandable stream with an explicit endianness.
    pub fn with_endian(endian: Endian) -> Self {
        let mut stream = Self::with_capacity(0);
        stream.endian = endian;
        stream
    }

    /// Wrap an entire buffer as a fixed-size stream. The stream cannot grow
    /// and its length is the buffer's length.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        let len = buf.len();
        Self {
            buf,
            origin: 0,
            len,
            pos: 0,
            endian: crate::default_endian(),
            expandable: false,
        }
    }

    /// Wrap the sub-range `[index, index + count)` of a buffer as a
    /// fixed-size stream. Positions reported by the stream are relative to
    /// `index`. Fails with a range error if the window falls outside the
    /// buffer.
    pub fn wrap(buf: Vec<u8>, index: usize, count: usize) -> Result<Self> {
        let end = index
            .checked_add(count)
            .filter(|end| *end <= buf.len())
            .ok_or_else(|| Error::range("wrapped range outside of buffer"))?;
        Ok(Self {
            buf,
            origin: index,
            len: end,
            pos: index,
            endian: crate::default_endian(),
            expandable: false,
        })
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Current read/write position, relative to the origin.
    pub fn position(&self) -> usize {
        self.pos - self.origin
    }

    /// Move the position. Moving past the length is allowed; a later read
    /// fails there, a later write zero-fills up to it.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        self.pos = self
            .origin
            .checked_add(position)
            .ok_or_else(|| Error::range("position overflow"))?;
        Ok(())
    }

    /// Logical length of the stream, relative to the origin.
    pub fn len(&self) -> usize {
        self.len - self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.len == self.origin
    }

    /// Grow or shrink the logical length. Growing zero-fills and may expand
    /// the capacity; shrinking clamps the position to the new end.
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        let end = self
            .origin
            .checked_add(len)
            .ok_or_else(|| Error::range("length overflow"))?;
        if end > self.buf.len() {
            self.grow(end)?;
        }
        if end > self.len {
            self.buf[self.len..end].fill(0);
        } else if self.pos > end {
            self.pos = end;
        }
        self.len = end;
        Ok(())
    }

    /// Capacity of the underlying region, relative to the origin.
    pub fn capacity(&self) -> usize {
        self.buf.len() - self.origin
    }

    /// Resize the underlying region. Cannot go below the current length, and
    /// a fixed-size stream cannot grow.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        let end = self
            .origin
            .checked_add(capacity)
            .ok_or_else(|| Error::range("capacity overflow"))?;
        if end < self.len {
            return Err(Error::range("capacity below stream length"));
        }
        if end > self.buf.len() && !self.expandable {
            return Err(Error::eof());
        }
        self.buf.resize(end, 0);
        Ok(())
    }

    /// Seek like `std::io::Seek`, relative to the origin. Seeking before the
    /// origin fails; seeking past the end is allowed.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset)
                .ok()
                .and_then(|offset| (self.origin as i64).checked_add(offset)),
            SeekFrom::Current(offset) => (self.pos as i64).checked_add(offset),
            SeekFrom::End(offset) => (self.len as i64).checked_add(offset),
        };
        match target {
            Some(target) if target >= self.origin as i64 => {
                self.pos = target as usize;
                Ok(self.position() as u64)
            }
            _ => Err(Error::range("seek before start of stream")),
        }
    }

    /// Bytes left between the position and the logical end.
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.pos)
    }

    /// The live contents of the stream, origin to logical end.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.origin..self.len]
    }

    /// Consume the stream, returning its live contents.
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.origin == 0 {
            self.buf.truncate(self.len);
            self.buf
        } else {
            self.buf[self.origin..self.len].to_vec()
        }
    }

    fn take(&mut self, width: usize) -> Result<&[u8]> {
        let end = self.pos.checked_add(width).ok_or_else(Error::eof)?;
        if end > self.len {
            return Err(Error::eof());
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let endian = self.endian;
        let raw = self.take(2)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_u16(raw),
            Endian::Little => LittleEndian::read_u16(raw),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let endian = self.endian;
        let raw = self.take(4)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_i32(raw),
            Endian::Little => LittleEndian::read_i32(raw),
        })
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let endian = self.endian;
        let raw = self.take(8)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_i64(raw),
            Endian::Little => LittleEndian::read_i64(raw),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let endian = self.endian;
        let raw = self.take(4)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_f32(raw),
            Endian::Little => LittleEndian::read_f32(raw),
        })
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let endian = self.endian;
        let raw = self.take(8)?;
        Ok(match endian {
            Endian::Big => BigEndian::read_f64(raw),
            Endian::Little => LittleEndian::read_f64(raw),
        })
    }

    /// Read up to `count` bytes, truncated to what remains. Callers that
    /// need an exact count validate the returned length.
    pub fn read_bytes(&mut self, count: usize) -> Vec<u8> {
        let take = count.min(self.remaining());
        if take == 0 {
            // The position may sit beyond the end entirely.
            return Vec::new();
        }
        let out = self.buf[self.pos..self.pos + take].to_vec();
        self.pos += take;
        out
    }

    /// Read a u16-length-prefixed UTF-8 string. Fails with end-of-stream if
    /// the prefix runs past the input, and with a format error if the bytes
    /// are not valid UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| Error::nonunicode_string(raw))
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_raw(&[value])
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_raw(&[value as u8])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let mut raw = [0; 2];
        match self.endian {
            Endian::Big => BigEndian::write_u16(&mut raw, value),
            Endian::Little => LittleEndian::write_u16(&mut raw, value),
        }
        self.write_raw(&raw)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_u16(value as u16)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let mut raw = [0; 4];
        match self.endian {
            Endian::Big => BigEndian::write_i32(&mut raw, value),
            Endian::Little => LittleEndian::write_i32(&mut raw, value),
        }
        self.write_raw(&raw)
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let mut raw = [0; 8];
        match self.endian {
            Endian::Big => BigEndian::write_i64(&mut raw, value),
            Endian::Little => LittleEndian::write_i64(&mut raw, value),
        }
        self.write_raw(&raw)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let mut raw = [0; 4];
        match self.endian {
            Endian::Big => BigEndian::write_f32(&mut raw, value),
            Endian::Little => LittleEndian::write_f32(&mut raw, value),
        }
        self.write_raw(&raw)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let mut raw = [0; 8];
        match self.endian {
            Endian::Big => BigEndian::write_f64(&mut raw, value),
            Endian::Little => LittleEndian::write_f64(&mut raw, value),
        }
        self.write_raw(&raw)
    }

    /// Write a u16-length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let raw = value.as_bytes();
        if raw.len() > u16::MAX as usize {
            return Err(Error::format("string too long for u16 length prefix"));
        }
        self.write_u16(raw.len() as u16)?;
        self.write_raw(raw)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_raw(bytes)
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos.checked_add(bytes.len()).ok_or_else(Error::eof)?;
        if end > self.buf.len() {
            self.grow(end)?;
        }
        if self.pos > self.len {
            // Left behind by a seek past the end; the gap becomes part of
            // the stream and must not leak stale bytes.
            self.buf[self.len..self.pos].fill(0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        if end > self.len {
            self.len = end;
        }
        Ok(())
    }

    fn grow(&mut self, required: usize) -> Result<()> {
        if !self.expandable {
            return Err(Error::eof());
        }
        let doubled = self
            .buf
            .len()
            .saturating_mul(2)
            .min(isize::MAX as usize)
            .max(MIN_GROWTH);
        self.buf.resize(required.max(doubled), 0);
        Ok(())
    }
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}
