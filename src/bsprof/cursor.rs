//! Forward-only cursor over a capture buffer.
//!
//! The cursor knows nothing about record semantics; it only decodes the
//! primitive field encodings and tracks the read position.

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_8;

use super::codec::varint;
use super::options::Utf8Policy;
use super::types::error::{BsprofError, Result};

/// Sequential reader over an in-memory capture.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    index: usize,
    utf8: Utf8Policy,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], utf8: Utf8Policy) -> Self {
        Self { bytes, index: 0, utf8 }
    }

    /// Current absolute read position.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of unread bytes.
    pub fn bytes_left(&self) -> usize {
        self.bytes.len().saturating_sub(self.index)
    }

    pub fn has_bytes_to_read(&self) -> bool {
        self.bytes_left() > 0
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.bytes_left();
        if count > available {
            return Err(BsprofError::UnexpectedEof {
                offset: self.index,
                needed: count,
                available,
            });
        }
        let slice = &self.bytes[self.index..self.index + count];
        self.index += count;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads exactly `N` raw bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a varint interpreted as a 64-bit field.
    pub fn read_u64(&mut self) -> Result<u64> {
        varint::decode_varint(self.bytes, &mut self.index)
    }

    /// Reads a varint interpreted as a 32-bit field.
    ///
    /// Same wire encoding as [`read_u64`](Self::read_u64); values wider than
    /// 32 bits are rejected rather than truncated.
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        let offset = self.index;
        let value = self.read_u64()?;
        u32::try_from(value).map_err(|_| BsprofError::ValueOutOfRange {
            offset,
            value,
            context,
        })
    }

    /// Reads a 4-byte little-endian IEEE-754 float.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Reads a null-terminated UTF-8 string. The terminator is consumed but
    /// not returned.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.index;
        let rest = &self.bytes[start.min(self.bytes.len())..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(BsprofError::UnexpectedEof {
                offset: self.bytes.len(),
                needed: 1,
                available: 0,
            });
        };
        let raw = self.take(len)?;
        self.index += 1;

        let (text, had_errors) = UTF_8.decode_with_bom_removal(raw);
        if had_errors && self.utf8 == Utf8Policy::Strict {
            return Err(BsprofError::InvalidUtf8 { offset: start });
        }
        Ok(text.into_owned())
    }

    /// Moves the cursor to an absolute offset at or after the current one.
    pub fn skip_to(&mut self, offset: usize) -> Result<()> {
        if offset < self.index {
            return Err(BsprofError::HeaderSizeMismatch {
                declared: offset,
                position: self.index,
            });
        }
        if offset > self.bytes.len() {
            return Err(BsprofError::UnexpectedEof {
                offset: self.index,
                needed: offset - self.index,
                available: self.bytes_left(),
            });
        }
        self.index = offset;
        Ok(())
    }
}
