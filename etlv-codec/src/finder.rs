//! Token finder
//!
//! Scans a buffer for the first token with a given tag. Non-matching tokens
//! are skipped by their length without being stored.

use etlv_core::{TlvError, TlvResult, Token};

use crate::observer::{NOOP, TokenObserver};
use crate::reader::TlvReader;

/// Token located by a find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<'a> {
    /// Byte offset of the token's tag field
    pub offset: usize,
    pub token: Token<'a>,
}

/// Token finder
pub struct Finder<'o> {
    observer: &'o dyn TokenObserver,
}

impl Finder<'static> {
    pub fn new() -> Self {
        Self { observer: &NOOP }
    }
}

impl Default for Finder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> Finder<'o> {
    pub fn with_observer<'n>(self, observer: &'n dyn TokenObserver) -> Finder<'n> {
        Finder { observer }
    }

    /// Find the first token tagged `tag` in `src`
    ///
    /// # Error Handling
    /// - `NotFound`: the scan reached the end of `src` without a match
    /// - any tag/length decode error met on the way; a skipped value running
    ///   past the end of `src` is `MsgSize`
    pub fn find<'a>(&self, tag: u32, src: &'a [u8]) -> TlvResult<Found<'a>> {
        self.observer.on_buffer(src);

        let mut reader = TlvReader::new(src);
        loop {
            let (offset, token) = match reader.next_token() {
                Ok(Some(item)) => item,
                Ok(None) => return Err(TlvError::NotFound),
                Err(e) => {
                    log::debug!("TLV find for tag 0x{:X} stopped at offset {}: {}", tag, reader.offset(), e);
                    self.observer.on_error(reader.offset(), &e);
                    return Err(e);
                }
            };

            if token.tag == tag {
                self.observer.on_token(offset, token.tag, token.value);
                return Ok(Found { offset, token });
            }
        }
    }
}

/// Find the first token tagged `tag` in `src`
pub fn find(tag: u32, src: &[u8]) -> TlvResult<Found<'_>> {
    Finder::new().find(tag, src)
}
