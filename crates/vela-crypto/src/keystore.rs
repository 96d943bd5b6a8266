//! Password-encrypted keystore files (version 4)
//!
//! The password is stretched with scrypt into 32 bytes. The first half keys
//! an AES-128-CTR stream over the secret; the second half keys an
//! HMAC-SHA256 over the ciphertext. The MAC is checked before anything is
//! decrypted.

use std::fmt;
use std::fs;
use std::path::Path;

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;
use vela_primitives::Address;
use zeroize::Zeroizing;

use crate::{public_key_to_address, secret_key_from_bytes, CryptoError, SecretKey};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Keystore format version written and accepted
pub const KEYSTORE_VERSION: u32 = 4;

const CIPHER: &str = "aes-128-ctr";
const KDF: &str = "scrypt";

const SCRYPT_N: u32 = 4096;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_DKLEN: usize = 32;

const SALT_LEN: usize = 32;
const IV_LEN: usize = 16;

/// What a keystore holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeystoreKind {
    /// A single 32-byte secret key
    SecretKey,
    /// A mnemonic phrase
    Mnemonic,
}

/// Decrypted keystore content
pub enum KeystoreSecret {
    /// 32-byte Ed25519 secret key
    SecretKey(Zeroizing<[u8; 32]>),
    /// Mnemonic phrase
    Mnemonic(Zeroizing<String>),
}

impl KeystoreSecret {
    /// Kind tag matching this content
    pub fn kind(&self) -> KeystoreKind {
        match self {
            KeystoreSecret::SecretKey(_) => KeystoreKind::SecretKey,
            KeystoreSecret::Mnemonic(_) => KeystoreKind::Mnemonic,
        }
    }
}

impl fmt::Debug for KeystoreSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeystoreSecret::SecretKey(_) => f.write_str("KeystoreSecret::SecretKey([REDACTED])"),
            KeystoreSecret::Mnemonic(_) => f.write_str("KeystoreSecret::Mnemonic([REDACTED])"),
        }
    }
}

/// scrypt parameters as stored in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Derived key length
    pub dklen: usize,
    /// Hex salt
    pub salt: String,
    /// CPU/memory cost, a power of two
    pub n: u32,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

/// Cipher parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// Hex initialization vector
    pub iv: String,
}

/// Encrypted section of the keystore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSection {
    /// Hex ciphertext
    pub ciphertext: String,
    /// Cipher parameters
    pub cipherparams: CipherParams,
    /// Cipher name, always `aes-128-ctr`
    pub cipher: String,
    /// KDF name, always `scrypt`
    pub kdf: String,
    /// KDF parameters
    pub kdfparams: KdfParams,
    /// Hex HMAC-SHA256 over the ciphertext
    pub mac: String,
}

/// On-disk keystore JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreFile {
    /// Format version
    pub version: u32,
    /// Content kind
    pub kind: KeystoreKind,
    /// Random identifier
    pub id: String,
    /// Hex public key (secret key keystores only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Bech32 address (secret key keystores only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bech32: Option<String>,
    /// Encrypted payload
    pub crypto: CryptoSection,
}

impl KeystoreFile {
    /// Encrypt a secret key. The payload is the secret followed by the public key.
    pub fn encrypt_secret_key(secret_key: &SecretKey, password: &str) -> Result<Self, CryptoError> {
        let public_key = secret_key.verifying_key();
        let mut payload = Zeroizing::new(Vec::with_capacity(64));
        payload.extend_from_slice(secret_key.as_bytes());
        payload.extend_from_slice(public_key.as_bytes());

        let address = public_key_to_address(&public_key);
        let crypto = encrypt(&payload, password)?;
        Ok(Self {
            version: KEYSTORE_VERSION,
            kind: KeystoreKind::SecretKey,
            id: Uuid::new_v4().to_string(),
            address: Some(address.to_hex()),
            bech32: Some(address.to_bech32()),
            crypto,
        })
    }

    /// Encrypt a mnemonic phrase
    pub fn encrypt_mnemonic(mnemonic: &str, password: &str) -> Result<Self, CryptoError> {
        let crypto = encrypt(mnemonic.trim().as_bytes(), password)?;
        Ok(Self {
            version: KEYSTORE_VERSION,
            kind: KeystoreKind::Mnemonic,
            id: Uuid::new_v4().to_string(),
            address: None,
            bech32: None,
            crypto,
        })
    }

    /// Decrypt the content. Fails with [`CryptoError::WrongPassword`] when the MAC does not match.
    pub fn decrypt(&self, password: &str) -> Result<KeystoreSecret, CryptoError> {
        if self.version != KEYSTORE_VERSION {
            return Err(CryptoError::Keystore(format!(
                "unsupported version {}",
                self.version
            )));
        }
        let plaintext = decrypt(&self.crypto, password)?;

        match self.kind {
            KeystoreKind::SecretKey => {
                if plaintext.len() < 32 {
                    return Err(CryptoError::Keystore(format!(
                        "secret payload too short: {} bytes",
                        plaintext.len()
                    )));
                }
                let mut secret = Zeroizing::new([0u8; 32]);
                secret.copy_from_slice(&plaintext[..32]);
                Ok(KeystoreSecret::SecretKey(secret))
            }
            KeystoreKind::Mnemonic => {
                let phrase = String::from_utf8(plaintext.to_vec())
                    .map_err(|_| CryptoError::Keystore("mnemonic is not utf-8".to_string()))?;
                Ok(KeystoreSecret::Mnemonic(Zeroizing::new(phrase)))
            }
        }
    }

    /// Decrypt a secret key keystore straight into a signing key
    pub fn decrypt_secret_key(&self, password: &str) -> Result<SecretKey, CryptoError> {
        match self.decrypt(password)? {
            KeystoreSecret::SecretKey(bytes) => secret_key_from_bytes(&bytes[..]),
            KeystoreSecret::Mnemonic(_) => Err(CryptoError::Keystore(
                "keystore holds a mnemonic, not a secret key".to_string(),
            )),
        }
    }

    /// Address recorded in a secret key keystore
    pub fn address(&self) -> Option<Address> {
        self.bech32
            .as_deref()
            .and_then(|b| Address::from_bech32(b).ok())
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string_pretty(self).map_err(|e| CryptoError::Keystore(e.to_string()))
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(json).map_err(|e| CryptoError::Keystore(e.to_string()))
    }

    /// Write to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CryptoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), kind = ?self.kind, "keystore saved");
        Ok(())
    }

    /// Read from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

fn derive_key(
    password: &str,
    params: &KdfParams,
) -> Result<Zeroizing<[u8; SCRYPT_DKLEN]>, CryptoError> {
    if params.dklen != SCRYPT_DKLEN {
        return Err(CryptoError::Keystore(format!(
            "unsupported dklen {}",
            params.dklen
        )));
    }
    if !params.n.is_power_of_two() || params.n < 2 {
        return Err(CryptoError::Keystore(format!(
            "scrypt n must be a power of two, got {}",
            params.n
        )));
    }
    let salt = hex::decode(&params.salt)
        .map_err(|e| CryptoError::Keystore(format!("bad salt: {}", e)))?;
    let log_n = params.n.trailing_zeros() as u8;
    let scrypt_params = scrypt::Params::new(log_n, params.r, params.p, SCRYPT_DKLEN)
        .map_err(|e| CryptoError::Keystore(e.to_string()))?;

    let mut derived = Zeroizing::new([0u8; SCRYPT_DKLEN]);
    scrypt::scrypt(password.as_bytes(), &salt, &scrypt_params, &mut derived[..])
        .map_err(|e| CryptoError::Keystore(e.to_string()))?;
    Ok(derived)
}

fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> Result<HmacSha256, CryptoError> {
    let mut mac =
        HmacSha256::new_from_slice(mac_key).map_err(|e| CryptoError::Keystore(e.to_string()))?;
    mac.update(ciphertext);
    Ok(mac)
}

fn apply_ctr(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
    let mut cipher =
        Aes128Ctr::new_from_slices(key, iv).map_err(|e| CryptoError::Keystore(e.to_string()))?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn encrypt(plaintext: &[u8], password: &str) -> Result<CryptoSection, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let kdfparams = KdfParams {
        dklen: SCRYPT_DKLEN,
        salt: hex::encode(salt),
        n: SCRYPT_N,
        r: SCRYPT_R,
        p: SCRYPT_P,
    };
    let derived = derive_key(password, &kdfparams)?;

    let mut ciphertext = plaintext.to_vec();
    apply_ctr(&derived[..16], &iv, &mut ciphertext)?;
    let mac = compute_mac(&derived[16..], &ciphertext)?.finalize().into_bytes();

    Ok(CryptoSection {
        ciphertext: hex::encode(&ciphertext),
        cipherparams: CipherParams { iv: hex::encode(iv) },
        cipher: CIPHER.to_string(),
        kdf: KDF.to_string(),
        kdfparams,
        mac: hex::encode(mac),
    })
}

fn decrypt(crypto: &CryptoSection, password: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if crypto.cipher != CIPHER {
        return Err(CryptoError::Keystore(format!(
            "unsupported cipher {}",
            crypto.cipher
        )));
    }
    if crypto.kdf != KDF {
        return Err(CryptoError::Keystore(format!("unsupported kdf {}", crypto.kdf)));
    }
    let ciphertext = hex::decode(&crypto.ciphertext)
        .map_err(|e| CryptoError::Keystore(format!("bad ciphertext: {}", e)))?;
    let iv = hex::decode(&crypto.cipherparams.iv)
        .map_err(|e| CryptoError::Keystore(format!("bad iv: {}", e)))?;
    let expected_mac = hex::decode(&crypto.mac)
        .map_err(|e| CryptoError::Keystore(format!("bad mac: {}", e)))?;

    let derived = derive_key(password, &crypto.kdfparams)?;
    compute_mac(&derived[16..], &ciphertext)?
        .verify_slice(&expected_mac)
        .map_err(|_| CryptoError::WrongPassword)?;

    let mut plaintext = Zeroizing::new(ciphertext);
    apply_ctr(&derived[..16], &iv, &mut plaintext[..])?;
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret_key_from_hex;

    const SECRET: &str = "413f42575f7f26fad3317a778771212fdb80245850981e48b58a4f25e344e8f9";

    #[test]
    fn test_secret_key_roundtrip() {
        let secret = secret_key_from_hex(SECRET).unwrap();
        let keystore = KeystoreFile::encrypt_secret_key(&secret, "password").unwrap();

        assert_eq!(keystore.version, 4);
        assert_eq!(keystore.kind, KeystoreKind::SecretKey);
        assert_eq!(
            keystore.bech32.as_deref(),
            Some("erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th")
        );

        let decrypted = keystore.decrypt_secret_key("password").unwrap();
        assert_eq!(decrypted.to_bytes(), secret.to_bytes());
    }

    #[test]
    fn test_secret_key_payload_includes_public_key() {
        let secret = secret_key_from_hex(SECRET).unwrap();
        let keystore = KeystoreFile::encrypt_secret_key(&secret, "pw").unwrap();
        let ciphertext = hex::decode(&keystore.crypto.ciphertext).unwrap();
        assert_eq!(ciphertext.len(), 64);
    }

    #[test]
    fn test_wrong_password() {
        let secret = secret_key_from_hex(SECRET).unwrap();
        let keystore = KeystoreFile::encrypt_secret_key(&secret, "right").unwrap();
        assert!(matches!(
            keystore.decrypt("wrong"),
            Err(CryptoError::WrongPassword)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails_mac() {
        let keystore = KeystoreFile::encrypt_mnemonic("abandon ability", "pw").unwrap();
        let mut tampered = keystore.clone();
        let mut bytes = hex::decode(&tampered.crypto.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        tampered.crypto.ciphertext = hex::encode(bytes);
        assert!(matches!(
            tampered.decrypt("pw"),
            Err(CryptoError::WrongPassword)
        ));
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        let phrase = "moral volcano peasant pass circle pen over picture flat shop clap goat never lyrics gather prepare woman film husband gravity behind test tiger improve";
        let keystore = KeystoreFile::encrypt_mnemonic(phrase, "pw").unwrap();
        assert_eq!(keystore.kind, KeystoreKind::Mnemonic);
        assert!(keystore.address.is_none());

        match keystore.decrypt("pw").unwrap() {
            KeystoreSecret::Mnemonic(m) => assert_eq!(m.as_str(), phrase),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_mnemonic_keystore_is_not_a_secret_key() {
        let keystore = KeystoreFile::encrypt_mnemonic("abandon ability", "pw").unwrap();
        assert!(matches!(
            keystore.decrypt_secret_key("pw"),
            Err(CryptoError::Keystore(_))
        ));
    }

    #[test]
    fn test_json_field_names() {
        let secret = secret_key_from_hex(SECRET).unwrap();
        let keystore = KeystoreFile::encrypt_secret_key(&secret, "pw").unwrap();
        let json: serde_json::Value = serde_json::from_str(&keystore.to_json().unwrap()).unwrap();

        assert_eq!(json["kind"], "secretKey");
        assert_eq!(json["crypto"]["cipher"], "aes-128-ctr");
        assert_eq!(json["crypto"]["kdf"], "scrypt");
        assert_eq!(json["crypto"]["kdfparams"]["n"], 4096);
        assert_eq!(json["crypto"]["kdfparams"]["dklen"], 32);
    }

    #[test]
    fn test_unsupported_version() {
        let mut keystore = KeystoreFile::encrypt_mnemonic("abandon ability", "pw").unwrap();
        keystore.version = 3;
        assert!(matches!(keystore.decrypt("pw"), Err(CryptoError::Keystore(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secret = KeystoreSecret::Mnemonic(Zeroizing::new("top secret words".to_string()));
        assert!(!format!("{:?}", secret).contains("secret words"));
    }
}
