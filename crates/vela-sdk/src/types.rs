//! Gateway resource types

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Map;
use vela_primitives::Address;

use crate::SdkError;

/// Default surcharge for guarded transactions
pub const DEFAULT_EXTRA_GAS_LIMIT_GUARDED_TX: u64 = 50_000;

/// Gas price modifier as an exact fraction of [`GasPriceModifier::SCALE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GasPriceModifier(u64);

impl GasPriceModifier {
    /// Denominator of the stored fraction
    pub const SCALE: u64 = 1_000_000;

    /// Modifier of 1 (full price)
    pub const ONE: GasPriceModifier = GasPriceModifier(Self::SCALE);

    /// Build from parts-per-million
    pub const fn from_micros(micros: u64) -> Self {
        GasPriceModifier(micros)
    }

    /// Parts-per-million
    pub fn micros(&self) -> u64 {
        self.0
    }
}

impl FromStr for GasPriceModifier {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SdkError::Serialization(format!("invalid gas price modifier: {}", s));
        let s = s.trim();
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(bad());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        // digits past the sixth decimal are below the resolution
        let fraction: String = fraction.chars().chain("000000".chars()).take(6).collect();
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| bad())?
        };
        let fraction: u64 = fraction.parse().map_err(|_| bad())?;
        whole
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(fraction))
            .map(GasPriceModifier)
            .ok_or_else(bad)
    }
}

impl fmt::Display for GasPriceModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let fraction = self.0 % Self::SCALE;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let fraction = format!("{:06}", fraction);
        write!(f, "{}.{}", whole, fraction.trim_end_matches('0'))
    }
}

impl Serialize for GasPriceModifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GasPriceModifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // gateways send a string, some APIs send a JSON number
        let raw = serde_json::Value::deserialize(deserializer)?;
        let text = match raw {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => return Err(de::Error::custom(format!("unexpected modifier {}", other))),
        };
        text.parse().map_err(de::Error::custom)
    }
}

/// Decimal-string arbitrary-precision amounts
pub mod biguint_string {
    use super::*;

    /// Serialize as a decimal string
    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    /// Deserialize from a decimal string or a JSON number
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let text = match raw {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => return Ok(BigUint::default()),
            other => return Err(de::Error::custom(format!("unexpected amount {}", other))),
        };
        if text.is_empty() {
            return Ok(BigUint::default());
        }
        text.parse().map_err(de::Error::custom)
    }
}

/// Chain parameters. Fetched once per provider and cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Chain identifier, part of every signed transaction
    #[serde(rename = "erd_chain_id", alias = "chainId")]
    pub chain_id: String,
    /// Minimum accepted gas price
    #[serde(rename = "erd_min_gas_price", alias = "minGasPrice")]
    pub min_gas_price: u64,
    /// Gas consumed by any transaction
    #[serde(rename = "erd_min_gas_limit", alias = "minGasLimit")]
    pub min_gas_limit: u64,
    /// Gas per byte of data
    #[serde(rename = "erd_gas_per_data_byte", alias = "gasPerDataByte")]
    pub gas_per_data_byte: u64,
    /// Discount applied to gas not spent on data
    #[serde(rename = "erd_gas_price_modifier", alias = "gasPriceModifier")]
    pub gas_price_modifier: GasPriceModifier,
    /// Lowest transaction version the chain accepts
    #[serde(rename = "erd_min_transaction_version", alias = "minTransactionVersion")]
    pub min_transaction_version: u32,
    /// Surcharge for guarded transactions
    #[serde(
        rename = "erd_extra_gas_limit_guarded_tx",
        alias = "extraGasLimitGuardedTx",
        default = "default_guarded_extra"
    )]
    pub extra_gas_limit_guarded_tx: u64,
    /// Shard count, metachain excluded
    #[serde(
        rename = "erd_num_shards_without_meta",
        alias = "numShards",
        default
    )]
    pub num_shards: u32,
}

fn default_guarded_extra() -> u64 {
    DEFAULT_EXTRA_GAS_LIMIT_GUARDED_TX
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: "D".to_string(),
            min_gas_price: 1_000_000_000,
            min_gas_limit: 50_000,
            gas_per_data_byte: 1_500,
            gas_price_modifier: GasPriceModifier::from_micros(10_000),
            min_transaction_version: 1,
            extra_gas_limit_guarded_tx: DEFAULT_EXTRA_GAS_LIMIT_GUARDED_TX,
            num_shards: 3,
        }
    }
}

/// Account as reported by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOnNetwork {
    /// Account address
    pub address: Address,
    /// Next nonce the account must use
    #[serde(default)]
    pub nonce: u64,
    /// Native balance in base units
    #[serde(default, with = "biguint_string")]
    pub balance: BigUint,
    /// Registered username, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Unknown fields, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

/// Guardian registered for an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    /// Guardian address
    pub address: Address,
    /// Epoch from which the guardian is active
    #[serde(default)]
    pub activation_epoch: u64,
    /// Co-signing service identifier
    #[serde(default, rename = "serviceUID")]
    pub service_uid: String,
}

/// Guardian state of an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianData {
    /// Whether transactions need a guardian co-signature
    #[serde(default)]
    pub guarded: bool,
    /// Currently active guardian
    #[serde(default)]
    pub active_guardian: Option<Guardian>,
    /// Guardian waiting for activation
    #[serde(default)]
    pub pending_guardian: Option<Guardian>,
}

/// Smart contract result attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContractResult {
    /// Result hash
    #[serde(default)]
    pub hash: String,
    /// Raw result data
    #[serde(default)]
    pub data: String,
    /// Error message, empty on success
    #[serde(default)]
    pub return_message: String,
    /// Unknown fields, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

/// Identifiers of log events that signal a failure
const ERROR_EVENT_IDENTIFIERS: &[&str] = &["signalError", "internalVMErrors"];

/// Log event emitted during execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// Event identifier
    #[serde(default)]
    pub identifier: String,
    /// Emitting address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Base64 topics
    #[serde(default)]
    pub topics: Vec<String>,
    /// Base64 data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl LogEvent {
    /// Error message carried by a failure event
    pub fn error_message(&self) -> Option<String> {
        if !ERROR_EVENT_IDENTIFIERS.contains(&self.identifier.as_str()) {
            return None;
        }
        let message = self
            .topics
            .get(1)
            .and_then(|t| STANDARD.decode(t).ok())
            .and_then(|b| String::from_utf8(b).ok())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.identifier.clone());
        Some(message)
    }
}

/// Logs attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLogs {
    /// Events in emission order
    #[serde(default)]
    pub events: Vec<LogEvent>,
}

/// Transaction as reported by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOnNetwork {
    /// Transaction hash
    #[serde(default)]
    pub hash: String,
    /// Raw status string
    #[serde(default)]
    pub status: String,
    /// Smart contract results
    #[serde(default, alias = "results")]
    pub smart_contract_results: Vec<SmartContractResult>,
    /// Execution logs
    #[serde(default)]
    pub logs: Option<TransactionLogs>,
    /// Unknown fields, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

impl TransactionOnNetwork {
    /// First error message found in results or logs
    pub fn contract_error(&self) -> Option<String> {
        let from_results = self
            .smart_contract_results
            .iter()
            .map(|r| r.return_message.trim())
            .find(|m| !m.is_empty())
            .map(str::to_string);
        if from_results.is_some() {
            return from_results;
        }
        self.logs
            .as_ref()
            .and_then(|logs| logs.events.iter().find_map(LogEvent::error_message))
    }
}

/// Read-only contract execution request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Contract address
    pub sc_address: Address,
    /// Endpoint name
    pub func_name: String,
    /// Caller seen by the contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
    /// Value seen by the contract, decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Hex-encoded arguments
    pub args: Vec<String>,
}

/// Query response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Base64 result buffers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub return_data: Vec<String>,
    /// Return code, `ok` on success
    #[serde(default)]
    pub return_code: String,
    /// Return message, empty on success
    #[serde(default)]
    pub return_message: String,
    /// Gas remaining after execution
    #[serde(default)]
    pub gas_remaining: u64,
}

impl QueryResponse {
    /// Whether the VM reported a failure
    pub fn is_failure(&self) -> bool {
        (!self.return_code.is_empty() && self.return_code != "ok")
            || !self.return_message.is_empty()
    }

    /// Decode the base64 buffers
    pub fn buffers(&self) -> Result<Vec<Vec<u8>>, SdkError> {
        Ok(crate::abi::decode_base64_buffers(&self.return_data)?)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
