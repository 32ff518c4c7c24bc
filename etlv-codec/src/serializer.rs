//! Token serializer
//!
//! Writes tokens in input order, each as tag, length, value. Tokens are not
//! reordered or deduplicated.
//!
//! # Partial Output
//!
//! When [`Serializer::serialize`] fails, bytes already written to `dest` are
//! left in place. The destination must be discarded. The growable variants
//! ([`Serializer::serialize_to_vec`], [`Serializer::serialize_into`]) size
//! the output up front and never leave partial data behind.

use bytes::BytesMut;
use etlv_core::{TlvError, TlvResult, Token};

use crate::length::{encode_length, encoded_length_len};
use crate::observer::{NOOP, TokenObserver};
use crate::tag::{encode_tag, encoded_tag_len};

fn overflow() -> TlvError {
    TlvError::Overflow("serialized size exceeds usize".to_string())
}

fn token_length(token: &Token<'_>) -> TlvResult<u32> {
    u32::try_from(token.length()).map_err(|_| {
        TlvError::Overflow(format!("value of {} bytes exceeds 32-bit length", token.length()))
    })
}

/// Token serializer
pub struct Serializer<'o> {
    observer: &'o dyn TokenObserver,
}

impl Serializer<'static> {
    pub fn new() -> Self {
        Self { observer: &NOOP }
    }
}

impl Default for Serializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> Serializer<'o> {
    pub fn with_observer<'n>(self, observer: &'n dyn TokenObserver) -> Serializer<'n> {
        Serializer { observer }
    }

    /// Exact number of bytes `serialize` writes for `tokens`
    pub fn serialized_len(&self, tokens: &[Token<'_>]) -> TlvResult<usize> {
        tokens.iter().try_fold(0usize, |total, token| {
            let size = encoded_tag_len(token.tag)?
                .checked_add(encoded_length_len(token_length(token)?)?)
                .and_then(|header| header.checked_add(token.length()))
                .ok_or_else(overflow)?;
            total.checked_add(size).ok_or_else(overflow)
        })
    }

    /// Serialize `tokens` into `dest`
    ///
    /// # Returns
    /// Returns the total number of bytes written.
    ///
    /// # Error Handling
    /// - `NoMemory`: `dest` cannot hold the next field
    /// - `Overflow`: a value is too long for the length field, or the running
    ///   total overflows
    /// - `Invalid`/`BadArgument`: a tag or length cannot be encoded (zero
    ///   length values included)
    pub fn serialize(&self, dest: &mut [u8], tokens: &[Token<'_>]) -> TlvResult<usize> {
        log::debug!("Serializing {} tokens into {} byte buffer", tokens.len(), dest.len());

        let mut written = 0usize;
        for token in tokens {
            let offset = written;
            match self.write_token(dest, written, token) {
                Ok(end) => written = end,
                Err(e) => {
                    self.observer.on_error(offset, &e);
                    return Err(e);
                }
            }
            self.observer.on_token(offset, token.tag, token.value);
        }

        self.observer.on_buffer(&dest[..written]);
        Ok(written)
    }

    /// Write one token at `start`, returning the offset past its value
    fn write_token(&self, dest: &mut [u8], start: usize, token: &Token<'_>) -> TlvResult<usize> {
        let length = token_length(token)?;
        let mut pos = start;

        let n = encode_tag(&mut dest[pos..], token.tag)?;
        pos = pos.checked_add(n).ok_or_else(overflow)?;

        let n = encode_length(&mut dest[pos..], length)?;
        pos = pos.checked_add(n).ok_or_else(overflow)?;

        let end = pos.checked_add(token.length()).ok_or_else(overflow)?;
        dest.get_mut(pos..end)
            .ok_or(TlvError::NoMemory)?
            .copy_from_slice(token.value);
        Ok(end)
    }

    /// Serialize `tokens` into a new, exactly sized vector
    pub fn serialize_to_vec(&self, tokens: &[Token<'_>]) -> TlvResult<Vec<u8>> {
        let mut buf = vec![0u8; self.serialized_len(tokens)?];
        let written = self.serialize(&mut buf, tokens)?;
        buf.truncate(written);
        Ok(buf)
    }

    /// Append the serialized `tokens` to `buf`
    ///
    /// On error `buf` keeps its previous contents.
    pub fn serialize_into(&self, buf: &mut BytesMut, tokens: &[Token<'_>]) -> TlvResult<usize> {
        let len = self.serialized_len(tokens)?;
        let start = buf.len();
        buf.resize(start + len, 0);

        match self.serialize(&mut buf[start..], tokens) {
            Ok(written) => Ok(written),
            Err(e) => {
                buf.truncate(start);
                Err(e)
            }
        }
    }
}

/// Serialize `tokens` into `dest`
pub fn serialize(dest: &mut [u8], tokens: &[Token<'_>]) -> TlvResult<usize> {
    Serializer::new().serialize(dest, tokens)
}

/// Exact serialized size of `tokens`
pub fn serialized_len(tokens: &[Token<'_>]) -> TlvResult<usize> {
    Serializer::new().serialized_len(tokens)
}

/// Serialize `tokens` into a new vector
pub fn serialize_to_vec(tokens: &[Token<'_>]) -> TlvResult<Vec<u8>> {
    Serializer::new().serialize_to_vec(tokens)
}

/// Append the serialized `tokens` to `buf`
pub fn serialize_into(buf: &mut BytesMut, tokens: &[Token<'_>]) -> TlvResult<usize> {
    Serializer::new().serialize_into(buf, tokens)
}
