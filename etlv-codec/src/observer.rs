//! Injected observers for codec activity
//!
//! Parser, serializer and finder report what they read and write to a
//! [`TokenObserver`]. The default [`NoopObserver`] ignores everything;
//! [`LogObserver`] forwards to the `log` facade at trace level.

use std::fmt;

use etlv_core::{CodecConfig, TlvError};

/// Receiver of codec events
///
/// All methods default to doing nothing.
#[cfg_attr(test, mockall::automock)]
pub trait TokenObserver {
    /// Called with the whole input before a parse or find, and with the
    /// written bytes after a successful serialize
    fn on_buffer(&self, _bytes: &[u8]) {}

    /// Called for every token read or written
    fn on_token(&self, _offset: usize, _tag: u32, _value: &[u8]) {}

    /// Called when an operation stops on an error
    fn on_error(&self, _offset: usize, _error: &TlvError) {}
}

/// Observer that ignores all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TokenObserver for NoopObserver {}

pub(crate) static NOOP: NoopObserver = NoopObserver;

/// Observer writing `log::trace!` records
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    dump_values: bool,
}

impl LogObserver {
    pub fn new() -> Self {
        Self { dump_values: true }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            dump_values: config.dump_values,
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenObserver for LogObserver {
    fn on_buffer(&self, bytes: &[u8]) {
        if self.dump_values {
            log::trace!("TLV buffer: {}", HexDump(bytes));
        } else {
            log::trace!("TLV buffer: {} bytes", bytes.len());
        }
    }

    fn on_token(&self, offset: usize, tag: u32, value: &[u8]) {
        if self.dump_values {
            log::trace!(
                "TLV token at {}: tag 0x{:08X}, len {}, val {}",
                offset,
                tag,
                value.len(),
                HexDump(value)
            );
        } else {
            log::trace!("TLV token at {}: tag 0x{:08X}, len {}", offset, tag, value.len());
        }
    }

    fn on_error(&self, offset: usize, error: &TlvError) {
        log::trace!("TLV error at {}: {}", offset, error);
    }
}

/// Formats bytes as `(len) hexdigits`
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) ", self.0.len())?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
