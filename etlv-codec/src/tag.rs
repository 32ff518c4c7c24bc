//! Tag field codec
//!
//! # Encoding Format
//!
//! Short form (low 5 bits of the first byte are 0-30):
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       x x x T T T T T   tag = the whole byte
//! ```
//!
//! Extended form (low 5 bits of the first byte are all set):
//! ```text
//! First byte:      x x x 1 1 1 1 1
//! Following bytes: 1 T T T T T T T  (continuation, bit 8 set)
//! Last byte:       0 T T T T T T T
//! ```
//!
//! The tag number is the raw concatenation of every tag byte, marker byte
//! included, read big-endian. `1F 88 01` is tag `0x1F8801`. Class and
//! constructed bits are not interpreted; a tag is a single unsigned number
//! of at most four bytes.

use etlv_core::{TlvError, TlvResult};

/// Low 5 bits of the first tag byte when the tag continues
pub const EXTENDED_TAG_MARKER: u8 = 0x1F;

/// Continuation bit of extended tag bytes
pub const TAG_CONTINUATION: u8 = 0x80;

/// Largest tag field handled (the tag must fit a `u32`)
pub const MAX_TAG_BYTES: usize = 4;

/// Whether a first tag byte announces the extended form
pub fn is_extended(first_byte: u8) -> bool {
    first_byte & EXTENDED_TAG_MARKER == EXTENDED_TAG_MARKER
}

/// Decode a tag field from the start of `data`
///
/// # Returns
/// Returns `Ok((tag, bytes_consumed))` if successful.
///
/// # Error Handling
/// - `NoData`: `data` is empty
/// - `Invalid`: first continuation byte is zero (zero-padded extension)
/// - `Overflow`: the tag no longer fits in 32 bits
/// - `MsgSize`: the buffer ends before the terminating byte, including a
///   lone extended marker byte
pub fn decode_tag(data: &[u8]) -> TlvResult<(u32, usize)> {
    let Some(&first) = data.first() else {
        return Err(TlvError::NoData);
    };

    if !is_extended(first) {
        return Ok((u32::from(first), 1));
    }

    match data.get(1).copied() {
        None => return Err(TlvError::MsgSize),
        Some(0) => {
            return Err(TlvError::Invalid(
                "first extended tag byte is zero".to_string(),
            ));
        }
        Some(_) => {}
    }

    let mut tag = u32::from(first);
    for (pos, &byte) in data.iter().enumerate().skip(1) {
        if tag > 0x00FF_FFFF {
            return Err(TlvError::Overflow(format!(
                "tag longer than {} bytes",
                MAX_TAG_BYTES
            )));
        }
        tag = (tag << 8) | u32::from(byte);

        if byte & TAG_CONTINUATION == 0 {
            return Ok((tag, pos + 1));
        }
    }

    Err(TlvError::MsgSize)
}

/// Number of bytes `encode_tag` writes for `tag`
///
/// # Error Handling
/// Returns `Invalid` for tags that do not form a well-formed tag field:
/// single-byte values carrying the extended marker, multi-byte values
/// whose leading byte lacks it, and multi-byte values whose continuation
/// bits would not decode back to the same tag.
pub fn encoded_tag_len(tag: u32) -> TlvResult<usize> {
    if tag <= 0xFF {
        if is_extended(tag as u8) {
            return Err(TlvError::Invalid(format!(
                "tag 0x{:02X} needs continuation bytes",
                tag
            )));
        }
        return Ok(1);
    }

    let bytes = tag.to_be_bytes();
    let significant = &bytes[(tag.leading_zeros() / 8) as usize..];
    check_extended(tag, significant)?;
    Ok(significant.len())
}

fn check_extended(tag: u32, bytes: &[u8]) -> TlvResult<()> {
    let invalid = |reason: &str| TlvError::Invalid(format!("tag 0x{:X}: {}", tag, reason));

    let (first, rest) = bytes
        .split_first()
        .ok_or_else(|| invalid("no tag bytes"))?;
    if !is_extended(*first) {
        return Err(invalid("leading byte lacks extended marker"));
    }
    let (last, middle) = rest
        .split_last()
        .ok_or_else(|| invalid("missing continuation bytes"))?;
    if rest[0] == 0 {
        return Err(invalid("first continuation byte is zero"));
    }
    if middle.iter().any(|&b| b & TAG_CONTINUATION == 0) {
        return Err(invalid("tag terminates before its last byte"));
    }
    if last & TAG_CONTINUATION != 0 {
        return Err(invalid("last byte has continuation bit set"));
    }
    Ok(())
}

/// Encode `tag` into the start of `dest`
///
/// # Returns
/// Returns the number of bytes written.
///
/// # Error Handling
/// - `Invalid`: see [`encoded_tag_len`]
/// - `NoMemory`: `dest` is too small; nothing is written
pub fn encode_tag(dest: &mut [u8], tag: u32) -> TlvResult<usize> {
    let len = encoded_tag_len(tag)?;
    let out = dest.get_mut(..len).ok_or(TlvError::NoMemory)?;
    out.copy_from_slice(&tag.to_be_bytes()[MAX_TAG_BYTES - len..]);
    Ok(len)
}
