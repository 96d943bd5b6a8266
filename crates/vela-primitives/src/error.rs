//! Common error types for primitives

use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Invalid length for a fixed-size type
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Bech32 encoding or decoding failed
    #[error("bech32 error: {0}")]
    Bech32(String),

    /// Bech32 human-readable part did not match
    #[error("unexpected address prefix: expected '{expected}', got '{actual}'")]
    WrongHrp {
        /// Expected prefix
        expected: String,
        /// Prefix found in the input
        actual: String,
    },

    /// Amount could not be parsed
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
