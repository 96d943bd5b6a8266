//! Binary ABI for contract arguments and results
//!
//! Values are encoded in one of two contexts. A top-level value stands alone
//! (one call argument, one result buffer) and carries no length prefixes; a
//! nested value sits inside a composite and is prefixed wherever its size is
//! not statically known.
//!
//! # Example
//!
//! ```rust
//! use vela_sdk::abi::{decode_top_level, encode_call_data, encode_nested, TypeValue, Value};
//!
//! assert_eq!(encode_nested(&Value::u32(10)).unwrap(), vec![0, 0, 0, 10]);
//! assert_eq!(encode_call_data("add", &[Value::u32(10)]).unwrap(), "add@0a");
//!
//! let decoded = decode_top_level(&[0x0a], &TypeValue::u32()).unwrap();
//! assert_eq!(decoded, Value::u32(10));
//! ```

mod args;
mod decode;
mod encode;
mod results;
mod types;
mod value;

use thiserror::Error;

pub use args::{encode_args, encode_call_data, ARGS_SEPARATOR};
pub use decode::{decode, decode_nested, decode_top_level};
pub use encode::{encode, encode_nested, encode_top_level};
pub use results::{decode_base64_buffers, CountedVariadicMode, ResultsParser};
pub use types::{BinaryType, EnumVariant, FieldDefinition, TypeValue};
pub use value::{Field, Value};

/// Encoding context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Standalone value
    TopLevel,
    /// Value inside a composite
    Nested,
}

/// Codec error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A value was unwrapped or encoded as the wrong kind
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected kind
        expected: String,
        /// Actual kind
        actual: String,
    },

    /// Bytes do not form a valid value of the requested type
    #[error("decode error: {0}")]
    Decode(String),

    /// Value cannot be represented
    #[error("encode error: {0}")]
    Encode(String),
}
