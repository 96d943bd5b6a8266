//! Mnemonic handling and hardened SLIP-0010 Ed25519 derivation
//!
//! Every account key lives on the path `m/44'/508'/0'/0'/{index}'`. Ed25519
//! only supports hardened children, so each segment is hardened.

use bip39::{Language, Mnemonic};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::{secret_key_from_bytes, CryptoError, SecretKey};

type HmacSha512 = Hmac<Sha512>;

/// BIP-44 coin type registered for the chain
pub const COIN_TYPE: u32 = 508;

/// Hardened-index marker bit
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for the SLIP-0010 master node on the ed25519 curve
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Entropy for a 24-word phrase
const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// Path segments (before hardening) for the account at `index`
pub fn account_path(index: u32) -> [u32; 5] {
    [44, COIN_TYPE, 0, 0, index]
}

/// Generate a fresh random 24-word English mnemonic
pub fn generate_mnemonic() -> Result<String, CryptoError> {
    let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

/// Validate a phrase and return its 64-byte seed (empty passphrase)
pub fn mnemonic_to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>, CryptoError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed("")))
}

/// A node in the derivation tree: 32-byte key plus 32-byte chain code
struct ExtendedKey {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    fn from_hmac(key: &[u8], data: &[u8]) -> Result<Self, CryptoError> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        mac.update(data);
        let mut output: [u8; 64] = mac.finalize().into_bytes().into();

        let mut node = ExtendedKey {
            key: Zeroizing::new([0u8; 32]),
            chain_code: Zeroizing::new([0u8; 32]),
        };
        node.key.copy_from_slice(&output[..32]);
        node.chain_code.copy_from_slice(&output[32..]);
        output.zeroize();
        Ok(node)
    }

    fn master(seed: &[u8]) -> Result<Self, CryptoError> {
        Self::from_hmac(ED25519_SEED_KEY, seed)
    }

    fn child(&self, index: u32) -> Result<Self, CryptoError> {
        let mut data = Zeroizing::new(Vec::with_capacity(37));
        data.push(0u8);
        data.extend_from_slice(&self.key[..]);
        data.extend_from_slice(&(index | HARDENED_OFFSET).to_be_bytes());
        Self::from_hmac(&self.chain_code[..], &data)
    }
}

/// Derive the raw 32-byte key at an arbitrary hardened path
pub fn derive_path(seed: &[u8], path: &[u32]) -> Result<Zeroizing<[u8; 32]>, CryptoError> {
    let mut node = ExtendedKey::master(seed)?;
    for &segment in path {
        if segment >= HARDENED_OFFSET {
            return Err(CryptoError::KeyDerivation(format!(
                "path segment {} out of range",
                segment
            )));
        }
        node = node.child(segment)?;
    }
    Ok(node.key)
}

/// Derive the account secret key at `index` from a BIP-39 seed
pub fn derive_secret_key(seed: &[u8], index: u32) -> Result<SecretKey, CryptoError> {
    let key = derive_path(seed, &account_path(index))?;
    secret_key_from_bytes(&key[..])
}
