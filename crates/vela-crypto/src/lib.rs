//! # vela-crypto
//!
//! Cryptographic primitives for Vela clients.
//!
//! - Ed25519 signing/verification
//! - Mnemonic (BIP-39) to secret key derivation along a hardened SLIP-0010 path
//! - Keccak-256 hashing for signed messages
//! - Password-encrypted keystore files

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
pub mod hd;
pub mod keystore;
mod signature;

pub use error::CryptoError;
pub use hash::keccak256;
pub use hd::{derive_secret_key, generate_mnemonic, mnemonic_to_seed};
pub use keystore::{KeystoreFile, KeystoreSecret};
pub use signature::{
    address_to_public_key, public_key_to_address, secret_key_from_bytes, secret_key_from_hex,
    sign, sign_message, verify, verify_message, PublicKey, SecretKey, Signature,
};
