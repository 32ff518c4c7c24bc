//! Definite-length BER-TLV codec
//!
//! This crate implements a subset of the ISO 8825-1 Basic Encoding Rules:
//! each value is a TLV (Tag-Length-Value) triplet.
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! - **Tag**: 1 byte, or a marker byte plus up to 3 continuation bytes
//!   (see [`tag`])
//! - **Length**: 1 byte for 0-127, otherwise a marker byte plus 1-4
//!   big-endian length bytes (see [`length`])
//! - **Value**: exactly `length` raw bytes
//!
//! # Operations
//!
//! - [`parse`]: decode a buffer into tokens borrowing from it
//! - [`serialize`]: encode tokens into a caller-supplied buffer
//! - [`find`]: locate the first token with a tag without storing the others
//!
//! # Implementation Notes
//!
//! 1. **Indefinite Length**: Not supported; the `0x80` length marker is
//!    rejected.
//! 2. **Nesting**: Parsing is single level. Parse a token's value again to
//!    descend into constructed values.
//! 3. **Tag Semantics**: Class and constructed bits are not interpreted.
//! 4. **No State**: Every call is a pure function of its arguments.

pub mod finder;
pub mod length;
pub mod observer;
pub mod parser;
pub mod reader;
pub mod serializer;
pub mod tag;

pub use finder::{Finder, Found, find};
pub use length::{decode_length, encode_length, encoded_length_len};
pub use observer::{HexDump, LogObserver, NoopObserver, TokenObserver};
pub use parser::{Parsed, Parser, SliceSink, TokenSink, parse, parse_into};
pub use reader::{Header, TlvReader};
pub use serializer::{Serializer, serialize, serialize_into, serialize_to_vec, serialized_len};
pub use tag::{decode_tag, encode_tag, encoded_tag_len};

pub use etlv_core::{CodecConfig, OwnedToken, ParseError, TlvError, TlvResult, Token};
