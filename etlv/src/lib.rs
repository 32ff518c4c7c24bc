//! etlv - definite-length BER-TLV codec
//!
//! This library lets protocol and storage code lay out variable-length,
//! arbitrarily ordered fields in a byte buffer without offset arithmetic,
//! and rejects malformed or truncated input.
//!
//! # Architecture
//!
//! - `etlv-core`: error kinds, the token data model and configuration
//! - `etlv-codec`: tag/length codecs, parser, serializer and finder
//!
//! # Usage
//!
//! ```rust
//! use etlv::{Token, find, parse, serialize_to_vec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let answer = 42u32.to_be_bytes();
//! let bytes = serialize_to_vec(&[Token::new(0x02, &answer), Token::new(0x04, b"hi")])?;
//!
//! let mut tokens = [Token::default(); 2];
//! let parsed = parse(&mut tokens, &bytes)?;
//! assert_eq!(parsed.tokens, 2);
//! assert_eq!(find(0x04, &bytes)?.token.value, b"hi");
//! # Ok(())
//! # }
//! ```

pub use etlv_codec::{
    decode_length, decode_tag, encode_length, encode_tag, encoded_length_len, encoded_tag_len,
    find, parse, parse_into, serialize, serialize_into, serialize_to_vec, serialized_len,
};
pub use etlv_codec::{
    Finder, Found, Header, HexDump, LogObserver, NoopObserver, Parsed, Parser, Serializer,
    SliceSink, TlvReader, TokenObserver, TokenSink,
};
pub use etlv_codec::{finder, length, observer, parser, reader, serializer, tag};
pub use etlv_core::{CodecConfig, OwnedToken, ParseError, TlvError, TlvResult, Token};
