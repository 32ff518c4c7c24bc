//! Token parser
//!
//! Decodes a whole buffer into an ordered token sequence, one level deep.
//! A token whose value is itself TLV-encoded is not expanded; parse its
//! `value` again to descend.
//!
//! # Output Capacity
//!
//! Output goes to a [`TokenSink`]. A fixed slice sink reports `NoMemory`
//! when full, and the returned [`ParseError`] still carries the number of
//! tokens the buffer holds, so the caller can size its output and retry:
//!
//! ```rust
//! use etlv_codec::{parse, Token};
//!
//! # fn main() -> Result<(), etlv_codec::ParseError> {
//! let data = [0x01, 0x01, 0xAA, 0x02, 0x01, 0xBB, 0x03, 0x01, 0xCC];
//! let mut tokens = [Token::default(); 2];
//! let count = match parse(&mut tokens, &data) {
//!     Ok(parsed) => parsed.tokens,
//!     Err(e) if e.is_capacity_exceeded() => {
//!         let mut tokens = vec![Token::default(); e.tokens_found];
//!         parse(&mut tokens, &data)?.tokens
//!     }
//!     Err(e) => return Err(e),
//! };
//! assert_eq!(count, 3);
//! # Ok(())
//! # }
//! ```

use etlv_core::{CodecConfig, ParseError, TlvError, TlvResult, Token};

use crate::observer::{NOOP, TokenObserver};
use crate::reader::TlvReader;

/// Capacity-checked destination for parsed tokens
pub trait TokenSink<'a> {
    /// Number of tokens stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether another token can be stored
    fn is_full(&self) -> bool;

    /// Store a token; `NoMemory` when full
    fn push_token(&mut self, token: Token<'a>) -> TlvResult<()>;
}

/// Fixed-capacity sink over a caller-owned slice
pub struct SliceSink<'s, 'a> {
    slots: &'s mut [Token<'a>],
    len: usize,
}

impl<'s, 'a> SliceSink<'s, 'a> {
    pub fn new(slots: &'s mut [Token<'a>]) -> Self {
        Self { slots, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Tokens stored so far
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.slots[..self.len]
    }
}

impl<'a> TokenSink<'a> for SliceSink<'_, 'a> {
    fn len(&self) -> usize {
        self.len
    }

    fn is_full(&self) -> bool {
        self.len >= self.slots.len()
    }

    fn push_token(&mut self, token: Token<'a>) -> TlvResult<()> {
        let slot = self.slots.get_mut(self.len).ok_or(TlvError::NoMemory)?;
        *slot = token;
        self.len += 1;
        Ok(())
    }
}

/// Growable sink; bounded only by [`CodecConfig::max_tokens`]
impl<'a> TokenSink<'a> for Vec<Token<'a>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn is_full(&self) -> bool {
        false
    }

    fn push_token(&mut self, token: Token<'a>) -> TlvResult<()> {
        self.push(token);
        Ok(())
    }
}

/// Result of a successful parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    /// Tokens appended to the sink
    pub tokens: usize,
    /// Bytes of input consumed (the whole buffer)
    pub consumed: usize,
}

/// Token parser
pub struct Parser<'o> {
    config: CodecConfig,
    observer: &'o dyn TokenObserver,
}

impl Parser<'static> {
    pub fn new() -> Self {
        Self {
            config: CodecConfig::default(),
            observer: &NOOP,
        }
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> Parser<'o> {
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer<'n>(self, observer: &'n dyn TokenObserver) -> Parser<'n> {
        Parser {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parse `src` into the fixed-capacity `out`
    ///
    /// # Returns
    /// Returns the token count and bytes consumed. On error, the first
    /// `tokens_found` entries of `out` are valid (for `NoMemory`, all of
    /// `out` is valid and `tokens_found` is the total the buffer holds).
    pub fn parse<'a>(&self, out: &mut [Token<'a>], src: &'a [u8]) -> Result<Parsed, ParseError> {
        self.parse_into(&mut SliceSink::new(out), src)
    }

    /// Parse `src`, appending tokens to `sink`
    pub fn parse_into<'a, S>(&self, sink: &mut S, src: &'a [u8]) -> Result<Parsed, ParseError>
    where
        S: TokenSink<'a> + ?Sized,
    {
        self.observer.on_buffer(src);

        let mut reader = TlvReader::new(src);
        let mut count = 0;
        while reader.has_remaining() {
            if self.is_full(sink, count) {
                return Err(self.capacity_exceeded(&mut reader, count));
            }

            let (offset, token) = match reader.next_token() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(kind) => return Err(self.fail(reader.offset(), kind, count)),
            };
            if let Err(kind) = sink.push_token(token) {
                return Err(self.fail(offset, kind, count));
            }
            self.observer.on_token(offset, token.tag, token.value);
            count += 1;
        }

        Ok(Parsed {
            tokens: count,
            consumed: reader.offset(),
        })
    }

    fn is_full<'a, S>(&self, sink: &S, count: usize) -> bool
    where
        S: TokenSink<'a> + ?Sized,
    {
        sink.is_full() || self.config.max_tokens.is_some_and(|max| count >= max)
    }

    /// Build the `NoMemory` error, counting the tokens left in `reader`
    /// when configured to
    ///
    /// A malformed token met while counting ends the count; the error kind
    /// stays `NoMemory`.
    fn capacity_exceeded(&self, reader: &mut TlvReader<'_>, stored: usize) -> ParseError {
        let offset = reader.offset();
        if !self.config.count_past_capacity {
            return self.fail(offset, TlvError::NoMemory, stored);
        }

        let mut total = stored;
        loop {
            match reader.next_token() {
                Ok(Some(_)) => total += 1,
                Ok(None) => break,
                Err(kind) => {
                    log::debug!("TLV token count stopped at offset {}: {}", reader.offset(), kind);
                    break;
                }
            }
        }
        self.fail(offset, TlvError::NoMemory, total)
    }

    fn fail(&self, offset: usize, kind: TlvError, tokens_found: usize) -> ParseError {
        log::debug!(
            "TLV parse stopped at offset {} after {} tokens: {}",
            offset,
            tokens_found,
            kind
        );
        self.observer.on_error(offset, &kind);
        ParseError::new(kind, tokens_found)
    }
}

/// Parse `src` into `out` with the default configuration
pub fn parse<'a>(out: &mut [Token<'a>], src: &'a [u8]) -> Result<Parsed, ParseError> {
    Parser::new().parse(out, src)
}

/// Parse `src` into `sink` with the default configuration
pub fn parse_into<'a, S>(sink: &mut S, src: &'a [u8]) -> Result<Parsed, ParseError>
where
    S: TokenSink<'a> + ?Sized,
{
    Parser::new().parse_into(sink, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::MockTokenObserver;

    const SHORT_DATA: [u8; 12] = [
        0x02, 0x04, 0x00, 0x00, 0x00, 0x2A, // 42
        0x02, 0x04, 0x00, 0x00, 0x01, 0x01, // 257
    ];

    #[test]
    fn test_parse_short_data() {
        let mut tokens = [Token::default(); 2];
        let parsed = parse(&mut tokens, &SHORT_DATA).unwrap();
        assert_eq!(parsed, Parsed { tokens: 2, consumed: 12 });

        assert_eq!(tokens[0].tag, 0x02);
        assert_eq!(tokens[0].length(), 4);
        assert_eq!(u32::from_be_bytes(tokens[0].value.try_into().unwrap()), 42);
        assert_eq!(u32::from_be_bytes(tokens[1].value.try_into().unwrap()), 257);
    }

    #[test]
    fn test_parse_empty_buffer() {
        let mut tokens = [Token::default(); 1];
        assert_eq!(parse(&mut tokens, &[]).unwrap(), Parsed { tokens: 0, consumed: 0 });
        let mut none: [Token<'_>; 0] = [];
        assert_eq!(parse(&mut none, &[]).unwrap().tokens, 0);
    }

    #[test]
    fn test_capacity_reports_true_count() {
        let data = [0x01, 0x01, 0xAA, 0x02, 0x00, 0x03, 0x01, 0xBB, 0x04, 0x00];
        let mut tokens = [Token::default(); 2];
        let err = parse(&mut tokens, &data).unwrap_err();
        assert_eq!(err.kind, TlvError::NoMemory);
        assert_eq!(err.tokens_found, 4);
        assert_eq!(tokens[1].tag, 0x02);

        let mut tokens = vec![Token::default(); err.tokens_found];
        assert_eq!(parse(&mut tokens, &data).unwrap().tokens, 4);
    }

    #[test]
    fn test_capacity_without_counting() {
        let data = [0x01, 0x01, 0xAA, 0x02, 0x00, 0x03, 0x01, 0xBB];
        let parser = Parser::new().with_config(CodecConfig::new().with_count_past_capacity(false));
        let mut tokens = [Token::default(); 1];
        let err = parser.parse(&mut tokens, &data).unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::NoMemory, 1));
    }

    #[test]
    fn test_capacity_count_hits_malformed_tail() {
        let data = [0x01, 0x01, 0xAA, 0x02, 0x05, 0xBB];
        let mut tokens = [Token::default(); 1];
        let err = parse(&mut tokens, &data).unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::NoMemory, 1));

        // Tokens counted before the malformed one are included
        let data = [0x01, 0x01, 0xAA, 0x02, 0x01, 0xBB, 0x03, 0x00, 0x04, 0x09, 0xCC];
        let err = parse(&mut tokens, &data).unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::NoMemory, 3));
    }

    #[test]
    fn test_capacity_exceeded_reports_offset() {
        let mut observer = MockTokenObserver::new();
        observer.expect_on_buffer().return_const(());
        observer.expect_on_token().times(1).return_const(());
        observer
            .expect_on_error()
            .withf(|offset, error| *offset == 3 && matches!(error, TlvError::NoMemory))
            .times(1)
            .return_const(());

        let data = [0x01, 0x01, 0xAA, 0x02, 0x00, 0x03, 0x00];
        let mut tokens = [Token::default(); 1];
        let err = Parser::new()
            .with_observer(&observer)
            .parse(&mut tokens, &data)
            .unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::NoMemory, 3));
    }

    #[test]
    fn test_truncated_value() {
        let data = [0x04, 0x0A, 1, 2, 3, 4, 5];
        let mut tokens = [Token::default(); 4];
        let err = parse(&mut tokens, &data).unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::MsgSize, 0));
    }

    #[test]
    fn test_error_keeps_earlier_tokens() {
        let data = [0x02, 0x01, 0x2A, 0x1F, 0x00, 0x01];
        let mut tokens = [Token::default(); 4];
        let err = parse(&mut tokens, &data).unwrap_err();
        assert!(matches!(err.kind, TlvError::Invalid(_)));
        assert_eq!(err.tokens_found, 1);
        assert_eq!(tokens[0], Token::new(0x02, &[0x2A]));
    }

    #[test]
    fn test_parse_into_vec() {
        let mut tokens = Vec::new();
        let parsed = parse_into(&mut tokens, &SHORT_DATA).unwrap();
        assert_eq!(parsed.tokens, 2);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_parse_into_vec_with_limit() {
        let parser = Parser::new().with_config(CodecConfig::new().with_max_tokens(1));
        let mut tokens = Vec::new();
        let err = parser.parse_into(&mut tokens, &SHORT_DATA).unwrap_err();
        assert_eq!(err, ParseError::new(TlvError::NoMemory, 2));
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_slice_sink() {
        let mut slots = [Token::default(); 1];
        let mut sink = SliceSink::new(&mut slots);
        assert!(sink.is_empty());
        sink.push_token(Token::new(0x05, &[])).unwrap();
        assert!(sink.is_full());
        assert_eq!(sink.push_token(Token::new(0x06, &[])), Err(TlvError::NoMemory));
        assert_eq!(sink.tokens().len(), sink.capacity());
    }

    #[test]
    fn test_observer_sees_tokens() {
        let mut observer = MockTokenObserver::new();
        observer
            .expect_on_buffer()
            .withf(|input| input.len() == 12)
            .times(1)
            .return_const(());
        observer
            .expect_on_token()
            .withf(|offset, tag, value| (*offset == 0 || *offset == 6) && *tag == 0x02 && value.len() == 4)
            .times(2)
            .return_const(());
        observer.expect_on_error().never();

        let mut tokens = [Token::default(); 2];
        Parser::new()
            .with_observer(&observer)
            .parse(&mut tokens, &SHORT_DATA)
            .unwrap();
    }

    #[test]
    fn test_observer_sees_error() {
        let mut observer = MockTokenObserver::new();
        observer.expect_on_buffer().return_const(());
        observer.expect_on_token().never();
        observer
            .expect_on_error()
            .withf(|offset, error| *offset == 0 && matches!(error, TlvError::NoData))
            .times(1)
            .return_const(());

        // A lone tag byte leaves nothing for the length field
        let data = [0x02];
        let mut tokens = [Token::default(); 1];
        let err = Parser::new()
            .with_observer(&observer)
            .parse(&mut tokens, &data)
            .unwrap_err();
        assert_eq!(err.kind, TlvError::NoData);
    }
}
