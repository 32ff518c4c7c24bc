//! Core types for the definite-length BER-TLV codec
//!
//! This crate provides the error kinds, the token data model and the codec
//! configuration used throughout the implementation.

pub mod config;
pub mod error;
pub mod token;

pub use config::CodecConfig;
pub use error::{ParseError, TlvError, TlvResult};
pub use token::{OwnedToken, Token};
