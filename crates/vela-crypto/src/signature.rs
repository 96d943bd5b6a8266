//! Ed25519 signing and verification

use std::fmt;

use ed25519_dalek::{Signer, Verifier};
use vela_primitives::Address;
use zeroize::Zeroize;

use crate::{keccak256, CryptoError};

/// Prefix prepended to messages before hashing, so a signed message can
/// never be replayed as a transaction
const MESSAGE_PREFIX: &[u8] = b"\x17Elrond Signed Message:\n";

/// Ed25519 secret key (32-byte seed)
pub type SecretKey = ed25519_dalek::SigningKey;

/// Ed25519 public key
pub type PublicKey = ed25519_dalek::VerifyingKey;

/// 64-byte Ed25519 signature
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Signature length in bytes
    pub const LEN: usize = 64;

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }

    /// Parse from hex (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        let bytes: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Signature(bytes))
    }

    /// Raw bytes
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    /// Lowercase hex, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Build a secret key from its 32-byte seed
pub fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey, CryptoError> {
    let mut seed: [u8; 32] = bytes.try_into().map_err(|_| {
        CryptoError::InvalidSecretKey(format!("expected 32 bytes, got {}", bytes.len()))
    })?;
    let key = SecretKey::from_bytes(&seed);
    seed.zeroize();
    Ok(key)
}

/// Build a secret key from hex. Accepts both with and without "0x" prefix.
pub fn secret_key_from_hex(s: &str) -> Result<SecretKey, CryptoError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let mut bytes =
        hex::decode(s).map_err(|_| CryptoError::InvalidSecretKey("not valid hex".to_string()))?;
    let result = secret_key_from_bytes(&bytes);
    bytes.zeroize();
    result
}

/// Sign the exact bytes given
pub fn sign(message: &[u8], secret_key: &SecretKey) -> Signature {
    Signature(secret_key.sign(message).to_bytes())
}

/// Verify a signature over the exact bytes given
pub fn verify(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    public_key.verify(message, &sig).is_ok()
}

/// Hash that is actually signed for an off-chain message
fn message_digest(message: &[u8]) -> [u8; 32] {
    let mut data = MESSAGE_PREFIX.to_vec();
    data.extend_from_slice(message.len().to_string().as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

/// Sign an off-chain message with the signed-message prefix
pub fn sign_message(message: &[u8], secret_key: &SecretKey) -> Signature {
    sign(&message_digest(message), secret_key)
}

/// Verify a signature produced by [`sign_message`]
pub fn verify_message(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    verify(&message_digest(message), signature, public_key)
}

/// The address is the public key itself
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    Address::from_bytes(public_key.to_bytes())
}

/// Public key behind an address, for verifying its signatures
pub fn address_to_public_key(address: &Address) -> Result<PublicKey, CryptoError> {
    PublicKey::from_bytes(address.as_bytes())
        .map_err(|_| CryptoError::InvalidSignature("address is not a valid public key".to_string()))
}
