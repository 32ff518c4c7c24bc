//! Sequential TLV reader
//!
//! The reader walks a buffer one token at a time without storing anything.
//! [`crate::parser`] and [`crate::finder`] are built on it, and callers use it
//! directly to walk a nested value:
//!
//! ```rust
//! use etlv_codec::{TlvReader, find};
//!
//! # fn main() -> etlv_codec::TlvResult<()> {
//! let data = [0x30, 0x06, 0x02, 0x01, 0x2A, 0x04, 0x01, 0xFF];
//! let outer = find(0x30, &data)?.token;
//! for item in TlvReader::new(outer.value) {
//!     let (offset, inner) = item?;
//!     println!("{}: tag 0x{:X}", offset, inner.tag);
//! }
//! # Ok(())
//! # }
//! ```

use etlv_core::{TlvError, TlvResult, Token};

use crate::length::decode_length;
use crate::tag::decode_tag;

/// Header of one token: tag and length fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte offset of the tag field
    pub offset: usize,
    pub tag: u32,
    pub length: u32,
    /// Combined size of the tag and length fields
    pub header_len: usize,
}

/// Cursor over a TLV-encoded buffer
///
/// # Bound Checking
///
/// Every token's value range is checked against the end of the buffer as
/// soon as its header is decoded. A value claiming more bytes than remain is
/// reported as `MsgSize` and the cursor does not advance.
pub struct TlvReader<'a> {
    buffer: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> TlvReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            failed: false,
        }
    }

    /// Offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Decode the tag and length fields at the current position
    ///
    /// The cursor does not move.
    pub fn peek_header(&self) -> TlvResult<Header> {
        let rest = &self.buffer[self.position..];
        let (tag, tag_len) = decode_tag(rest)?;
        let (length, length_len) = decode_length(&rest[tag_len..])?;
        Ok(Header {
            offset: self.position,
            tag,
            length,
            header_len: tag_len + length_len,
        })
    }

    /// Read the next token
    ///
    /// # Returns
    /// Returns `Ok(Some((offset, token)))` where `offset` is the position of
    /// the token's tag field, or `Ok(None)` once the buffer is exhausted.
    pub fn next_token(&mut self) -> TlvResult<Option<(usize, Token<'a>)>> {
        if !self.has_remaining() {
            return Ok(None);
        }

        let header = self.peek_header()?;
        let value_start = header.offset + header.header_len;
        let value_end = value_start
            .checked_add(header.length as usize)
            .ok_or(TlvError::MsgSize)?;
        let value = self
            .buffer
            .get(value_start..value_end)
            .ok_or(TlvError::MsgSize)?;

        self.position = value_end;
        Ok(Some((header.offset, Token::new(header.tag, value))))
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = TlvResult<(usize, Token<'a>)>;

    /// Yields tokens until the buffer is exhausted or the first error
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(item) => item.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
