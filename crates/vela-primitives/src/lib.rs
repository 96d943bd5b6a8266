//! # vela-primitives
//!
//! Primitive types shared by the Vela crates.
//!
//! - [`Address`]: 32-byte account address with a bech32 text form
//! - [`Token`] / [`TokenAmount`]: arbitrary-precision balances tied to a token

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod amount;
mod error;

pub use address::{Address, ADDRESS_LENGTH, DEFAULT_HRP};
pub use amount::{Token, TokenAmount};
pub use error::PrimitiveError;

pub use num_bigint::{BigInt, BigUint};

/// Account nonce type
pub type Nonce = u64;

/// Gas type
pub type Gas = u64;
