use thiserror::Error;

/// Error kinds produced by every TLV encode/decode step
///
/// Each codec step returns either its success value or exactly one of
/// these kinds. There are no retries inside the codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Not enough data for field")]
    NoData,

    #[error("Destination capacity exhausted")]
    NoMemory,

    #[error("Invalid encoding: {0}")]
    Invalid(String),

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Content extends past end of buffer")]
    MsgSize,

    #[error("Tag not found")]
    NotFound,
}

/// Result type alias for TLV operations
pub type TlvResult<T> = Result<T, TlvError>;

/// Failure of a parse call
///
/// Tokens stored before the failure stay valid. `tokens_found` counts them,
/// except for [`TlvError::NoMemory`] where it reports the number of tokens
/// the whole buffer holds, so the caller can grow its output and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} ({tokens_found} tokens found)")]
pub struct ParseError {
    #[source]
    pub kind: TlvError,
    pub tokens_found: usize,
}

impl ParseError {
    pub fn new(kind: TlvError, tokens_found: usize) -> Self {
        Self { kind, tokens_found }
    }

    /// True when the parse stopped only because the output was full
    pub fn is_capacity_exceeded(&self) -> bool {
        self.kind == TlvError::NoMemory
    }
}
