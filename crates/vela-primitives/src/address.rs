//! 32-byte account address with bech32 text form

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};

use crate::PrimitiveError;

/// Size of an address in bytes
pub const ADDRESS_LENGTH: usize = 32;

/// Human-readable prefix used when none is given explicitly
pub const DEFAULT_HRP: &str = "erd";

/// Number of leading zero bytes that mark a smart contract address
const SC_ADDRESS_ZERO_PREFIX: usize = 8;

/// Account address: the raw 32-byte Ed25519 public key of the owner,
/// or the deterministic address of a deployed contract.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = ADDRESS_LENGTH;

    /// Zero address
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, PrimitiveError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            slice.try_into().map_err(|_| PrimitiveError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: slice.len(),
            })?;
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, PrimitiveError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| PrimitiveError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse a bech32 address, accepting any human-readable prefix
    pub fn from_bech32(s: &str) -> Result<Self, PrimitiveError> {
        let (_, data) = bech32::decode(s).map_err(|e| PrimitiveError::Bech32(e.to_string()))?;
        Self::from_slice(&data)
    }

    /// Parse a bech32 address and require the given prefix
    pub fn from_bech32_with_hrp(s: &str, expected_hrp: &str) -> Result<Self, PrimitiveError> {
        let (hrp, data) = bech32::decode(s).map_err(|e| PrimitiveError::Bech32(e.to_string()))?;
        if hrp.as_str() != expected_hrp {
            return Err(PrimitiveError::WrongHrp {
                expected: expected_hrp.to_string(),
                actual: hrp.to_string(),
            });
        }
        Self::from_slice(&data)
    }

    /// Encode with the default prefix
    pub fn to_bech32(&self) -> String {
        self.to_bech32_with_hrp(DEFAULT_HRP)
            .unwrap_or_else(|_| self.to_hex())
    }

    /// Encode with an explicit prefix
    pub fn to_bech32_with_hrp(&self, hrp: &str) -> Result<String, PrimitiveError> {
        let hrp = Hrp::parse(hrp).map_err(|e| PrimitiveError::Bech32(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| PrimitiveError::Bech32(e.to_string()))
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Contract addresses start with eight zero bytes
    pub fn is_smart_contract(&self) -> bool {
        self.0[..SC_ADDRESS_ZERO_PREFIX].iter().all(|&b| b == 0)
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_bech32())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bech32())
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    /// Bech32 first, falling back to 64 hex characters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() == ADDRESS_LENGTH * 2 && stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(stripped);
        }
        Self::from_bech32(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_bech32())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        }
    }
}
