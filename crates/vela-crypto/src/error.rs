//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Mnemonic phrase failed validation
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Child key derivation failed
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Secret key bytes are malformed
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Signature bytes are malformed
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Keystore MAC did not match the derived key
    #[error("wrong password")]
    WrongPassword,

    /// Keystore file is malformed or unsupported
    #[error("keystore error: {0}")]
    Keystore(String),

    /// IO error while reading or writing a keystore
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
