//! Wallets and the signing boundary

use std::path::Path;

use async_trait::async_trait;
use vela_crypto::{
    derive_secret_key, generate_mnemonic, mnemonic_to_seed, public_key_to_address,
    secret_key_from_bytes, secret_key_from_hex, sign, sign_message, KeystoreFile,
    KeystoreSecret, PublicKey, SecretKey,
};
use vela_primitives::Address;

use crate::SdkError;

/// Anything that can sign on behalf of an address: bytes in, hex signature out.
///
/// [`Wallet`] signs locally. Hardware devices and remote co-signers
/// implement the same trait.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address whose key produces the signatures
    fn address(&self) -> Address;

    /// Sign the exact bytes given, returning a lowercase hex signature
    async fn sign(&self, payload: &[u8]) -> Result<String, SdkError>;
}

/// Wallet holding an Ed25519 secret key
///
/// Note: Clone is intentionally not implemented to prevent accidental key duplication.
/// Use `from_secret_key` to create a new wallet with the same key if needed.
pub struct Wallet {
    secret_key: SecretKey,
    address: Address,
}

impl Wallet {
    /// Create a wallet from a 32-byte secret key
    pub fn from_secret_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        Ok(Self::from_signing_key(secret_key_from_bytes(key)?))
    }

    /// Create a wallet from a hex-encoded secret key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_secret_key_hex(hex: &str) -> Result<Self, SdkError> {
        Ok(Self::from_signing_key(secret_key_from_hex(hex)?))
    }

    /// Derive the wallet at `index` from a mnemonic phrase
    pub fn from_mnemonic(phrase: &str, index: u32) -> Result<Self, SdkError> {
        let seed = mnemonic_to_seed(phrase)?;
        Ok(Self::from_signing_key(derive_secret_key(&seed[..], index)?))
    }

    /// Generate a fresh mnemonic and return it with the wallet at index 0
    pub fn generate() -> Result<(Self, String), SdkError> {
        let phrase = generate_mnemonic()?;
        let wallet = Self::from_mnemonic(&phrase, 0)?;
        Ok((wallet, phrase))
    }

    /// Open a keystore file. `index` selects the account for mnemonic keystores.
    pub fn from_keystore(
        path: impl AsRef<Path>,
        password: &str,
        index: u32,
    ) -> Result<Self, SdkError> {
        let keystore = KeystoreFile::load(path)?;
        match keystore.decrypt(password)? {
            KeystoreSecret::SecretKey(bytes) => Self::from_secret_key(&bytes),
            KeystoreSecret::Mnemonic(phrase) => Self::from_mnemonic(&phrase, index),
        }
    }

    /// Encrypt this wallet's key into a keystore
    pub fn to_keystore(&self, password: &str) -> Result<KeystoreFile, SdkError> {
        Ok(KeystoreFile::encrypt_secret_key(&self.secret_key, password)?)
    }

    fn from_signing_key(secret_key: SecretKey) -> Self {
        let address = public_key_to_address(&secret_key.verifying_key());
        Self {
            secret_key,
            address,
        }
    }

    /// Get the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        self.secret_key.verifying_key()
    }

    /// Sign raw bytes, returning lowercase hex
    pub fn sign_bytes(&self, payload: &[u8]) -> String {
        sign(payload, &self.secret_key).to_hex()
    }

    /// Sign an off-chain message with the signed-message prefix
    pub fn sign_message(&self, message: &[u8]) -> String {
        sign_message(message, &self.secret_key).to_hex()
    }
}

#[async_trait]
impl Signer for Wallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, payload: &[u8]) -> Result<String, SdkError> {
        Ok(self.sign_bytes(payload))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
