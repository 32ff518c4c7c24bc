//! Token data model
//!
//! A [`Token`] is a decoded `(tag, length, value)` triple whose value borrows
//! the buffer it was decoded from. [`OwnedToken`] copies the value out for
//! callers that must outlive that buffer.

use serde::{Deserialize, Serialize};

/// Decoded TLV token
///
/// `value` is a view into the source buffer; the length field is the
/// value's byte count, so the two can never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    /// Tag as an unsigned number (raw tag bytes, big-endian)
    pub tag: u32,
    /// Value bytes
    pub value: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn new(tag: u32, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Length field of this token (value byte count)
    pub fn length(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Copy the value out into an [`OwnedToken`]
    pub fn to_owned_token(&self) -> OwnedToken {
        OwnedToken::from(*self)
    }
}

/// TLV token owning its value bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedToken {
    pub tag: u32,
    #[serde(with = "serde_bytes")]
    pub value: Vec<u8>,
}

impl OwnedToken {
    pub fn new(tag: u32, value: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn length(&self) -> usize {
        self.value.len()
    }

    /// Borrow this token as a [`Token`] view
    pub fn as_token(&self) -> Token<'_> {
        Token::new(self.tag, &self.value)
    }
}

impl From<Token<'_>> for OwnedToken {
    fn from(token: Token<'_>) -> Self {
        Self {
            tag: token.tag,
            value: token.value.to_vec(),
        }
    }
}
