//! Length field codec
//!
//! # Encoding Format
//!
//! Short form (lengths 0-127):
//! ```text
//! Byte: 0 L L L L L L L
//! ```
//!
//! Long form:
//! ```text
//! First byte:      1 N N N N N N N  (N = 1..4 following length bytes)
//! Following bytes: L L L L L L L L  (big-endian length value)
//! ```
//!
//! `0x80` (indefinite length) and `0xFF` (reserved) are rejected, as is any
//! length with bit 32 set.

use etlv_core::{TlvError, TlvResult};

/// Bit 8 of the first length byte selects the long form
pub const LONG_FORM: u8 = 0x80;

/// Reserved first length byte
pub const RESERVED_LENGTH: u8 = 0xFF;

/// Largest short-form length
pub const MAX_SHORT_LENGTH: u32 = 0x7F;

/// Most length bytes accepted after the long-form marker
pub const MAX_LENGTH_BYTES: usize = 4;

/// Largest length value either direction accepts
///
/// A 4-byte length whose top bit is set is rejected on decode, so the
/// encoder refuses those lengths too and everything it writes decodes back.
pub const MAX_LENGTH: u32 = 0x7FFF_FFFF;

/// Decode a length field from the start of `data`
///
/// # Returns
/// Returns `Ok((length, bytes_consumed))` if successful.
///
/// # Error Handling
/// - `NoData`: `data` is empty
/// - `Invalid`: reserved `0xFF` marker or indefinite form (`0x80`)
/// - `Overflow`: more than 4 length bytes, or a 4-byte length whose most
///   significant byte has bit 8 set
/// - `MsgSize`: fewer length bytes remain than the marker announces
pub fn decode_length(data: &[u8]) -> TlvResult<(u32, usize)> {
    let Some(&first) = data.first() else {
        return Err(TlvError::NoData);
    };

    if first & LONG_FORM == 0 {
        return Ok((u32::from(first), 1));
    }

    if first == RESERVED_LENGTH {
        return Err(TlvError::Invalid("reserved length byte 0xFF".to_string()));
    }

    let count = usize::from(first & !LONG_FORM);
    if count == 0 {
        return Err(TlvError::Invalid(
            "indefinite length encoding not supported".to_string(),
        ));
    }
    if count > MAX_LENGTH_BYTES {
        return Err(TlvError::Overflow(format!(
            "length encoding too large: {} bytes (max {})",
            count, MAX_LENGTH_BYTES
        )));
    }

    let bytes = data.get(1..=count).ok_or(TlvError::MsgSize)?;
    if count == MAX_LENGTH_BYTES && bytes[0] & 0x80 != 0 {
        return Err(TlvError::Overflow(format!(
            "length exceeds 0x{:08X}",
            MAX_LENGTH
        )));
    }

    let length = bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
    Ok((length, 1 + count))
}

/// Number of bytes `encode_length` writes for `length`
///
/// The long form always uses the minimal number of length bytes.
pub fn encoded_length_len(length: u32) -> TlvResult<usize> {
    if length == 0 {
        return Err(TlvError::BadArgument(
            "zero length cannot be encoded".to_string(),
        ));
    }
    if length <= MAX_SHORT_LENGTH {
        return Ok(1);
    }
    if length > MAX_LENGTH {
        return Err(TlvError::Overflow(format!(
            "length {} exceeds 0x{:08X}",
            length, MAX_LENGTH
        )));
    }
    Ok(1 + MAX_LENGTH_BYTES - (length.leading_zeros() / 8) as usize)
}

/// Encode `length` into the start of `dest`
///
/// # Returns
/// Returns the number of bytes written.
///
/// # Error Handling
/// - `BadArgument`: `length` is zero. Decoding accepts `0x00`, encoding
///   does not.
/// - `Overflow`: `length` is above [`MAX_LENGTH`]
/// - `NoMemory`: `dest` is too small; nothing is written
pub fn encode_length(dest: &mut [u8], length: u32) -> TlvResult<usize> {
    let len = encoded_length_len(length)?;
    let out = dest.get_mut(..len).ok_or(TlvError::NoMemory)?;

    if len == 1 {
        out[0] = length as u8;
    } else {
        let count = len - 1;
        out[0] = LONG_FORM | count as u8;
        out[1..].copy_from_slice(&length.to_be_bytes()[MAX_LENGTH_BYTES - count..]);
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_short_length() {
        assert_eq!(decode_length(&[0x00]).unwrap(), (0, 1));
        assert_eq!(decode_length(&[0x04, 0xAA]).unwrap(), (4, 1));
        assert_eq!(decode_length(&[0x7F]).unwrap(), (127, 1));
    }

    #[test]
    fn test_decode_long_length() {
        assert_eq!(decode_length(&[0x81, 0x80]).unwrap(), (128, 2));
        assert_eq!(decode_length(&[0x82, 0x01, 0x01]).unwrap(), (257, 3));
        assert_eq!(
            decode_length(&[0x84, 0x7F, 0xFF, 0xFF, 0xFF]).unwrap(),
            (MAX_LENGTH, 5)
        );
    }

    #[test]
    fn test_decode_length_errors() {
        assert_eq!(decode_length(&[]), Err(TlvError::NoData));
        assert!(matches!(decode_length(&[0xFF, 0x01]), Err(TlvError::Invalid(_))));
        assert!(matches!(decode_length(&[0x80, 0x01]), Err(TlvError::Invalid(_))));
        assert!(matches!(
            decode_length(&[0x85, 0, 0, 0, 0, 1]),
            Err(TlvError::Overflow(_))
        ));
        assert!(matches!(
            decode_length(&[0x84, 0x80, 0x00, 0x00, 0x00]),
            Err(TlvError::Overflow(_))
        ));
        assert_eq!(decode_length(&[0x82, 0x01]), Err(TlvError::MsgSize));
    }

    #[test]
    fn test_short_length_boundary() {
        let mut buf = [0u8; 5];
        assert_eq!(encode_length(&mut buf, 1).unwrap(), 1);
        assert_eq!(encode_length(&mut buf, 127).unwrap(), 1);
        assert_eq!(buf[0], 0x7F);

        assert_eq!(encode_length(&mut buf, 128).unwrap(), 2);
        assert_eq!(&buf[..2], &[0x81, 0x80]);
        assert_eq!(encode_length(&mut buf, 257).unwrap(), 3);
        assert_eq!(&buf[..3], &[0x82, 0x01, 0x01]);
        assert_eq!(encode_length(&mut buf, 0x01_0000).unwrap(), 4);
        assert_eq!(&buf[..4], &[0x83, 0x01, 0x00, 0x00]);
        assert_eq!(encode_length(&mut buf, MAX_LENGTH).unwrap(), 5);
        assert_eq!(buf, [0x84, 0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_zero_length_is_asymmetric() {
        // 0x00 decodes as an empty value, but zero is refused on encode
        assert_eq!(decode_length(&[0x00]).unwrap(), (0, 1));
        let mut buf = [0u8; 1];
        assert!(matches!(encode_length(&mut buf, 0), Err(TlvError::BadArgument(_))));
    }

    #[test]
    fn test_encode_length_errors() {
        let mut buf = [0u8; 8];
        assert!(matches!(
            encode_length(&mut buf, 0x8000_0000),
            Err(TlvError::Overflow(_))
        ));

        let mut small = [0u8; 2];
        assert_eq!(encode_length(&mut small, 257), Err(TlvError::NoMemory));
        let mut empty: [u8; 0] = [];
        assert_eq!(encode_length(&mut empty, 5), Err(TlvError::NoMemory));
    }
}
