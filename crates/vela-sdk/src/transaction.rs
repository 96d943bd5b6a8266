//! Transactions, their signing form and fee

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;
use serde::Serialize;
use vela_primitives::Address;

use crate::types::{GasPriceModifier, NetworkConfig};
use crate::{SdkError, Signer};

/// Options bit marking a guarded transaction
pub const TRANSACTION_OPTIONS_GUARDED: u32 = 0b10;

/// Version used for plain transactions
pub const TRANSACTION_VERSION_DEFAULT: u32 = 1;

/// Version required for transactions with options
pub const TRANSACTION_VERSION_WITH_OPTIONS: u32 = 2;

/// A transaction. Built by [`crate::TxBuilder`] and friends; signing fills
/// the signature fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Sender nonce, snapshotted when the transaction was built
    pub nonce: u64,
    /// Native value transferred
    pub value: BigUint,
    /// Receiver
    pub receiver: Address,
    /// Sender
    pub sender: Address,
    /// Price per gas unit
    pub gas_price: u64,
    /// Gas limit
    pub gas_limit: u64,
    /// Payload, e.g. call data
    pub data: Vec<u8>,
    /// Chain identifier
    pub chain_id: String,
    /// Transaction version
    pub version: u32,
    /// Option bits
    pub options: u32,
    /// Guardian co-signer
    pub guardian: Option<Address>,
    /// Hex signature of the sender
    pub signature: Option<String>,
    /// Hex signature of the guardian
    pub guardian_signature: Option<String>,
}

/// Field layout shared by the signing form and the wire form.
/// Field order is significant: it is the byte order that gets signed.
#[derive(Serialize)]
struct TransactionJson<'a> {
    nonce: u64,
    value: String,
    receiver: String,
    sender: String,
    #[serde(rename = "gasPrice")]
    gas_price: u64,
    #[serde(rename = "gasLimit")]
    gas_limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(rename = "chainID")]
    chain_id: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guardian: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<&'a str>,
    #[serde(rename = "guardianSignature", skip_serializing_if = "Option::is_none")]
    guardian_signature: Option<&'a str>,
}

impl Transaction {
    fn to_json(&self, with_signatures: bool) -> TransactionJson<'_> {
        TransactionJson {
            nonce: self.nonce,
            value: self.value.to_str_radix(10),
            receiver: self.receiver.to_bech32(),
            sender: self.sender.to_bech32(),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: (!self.data.is_empty()).then(|| STANDARD.encode(&self.data)),
            chain_id: &self.chain_id,
            version: self.version,
            options: (self.options != 0).then_some(self.options),
            guardian: self.guardian.map(|g| g.to_bech32()),
            signature: if with_signatures {
                self.signature.as_deref()
            } else {
                None
            },
            guardian_signature: if with_signatures {
                self.guardian_signature.as_deref()
            } else {
                None
            },
        }
    }

    /// Canonical bytes that the sender and guardian sign
    pub fn serialize_for_signing(&self) -> Result<Vec<u8>, SdkError> {
        Ok(serde_json::to_vec(&self.to_json(false))?)
    }

    /// Wire JSON for `transaction/send`
    pub fn to_wire_json(&self) -> Result<serde_json::Value, SdkError> {
        Ok(serde_json::to_value(self.to_json(true))?)
    }

    /// Whether the guarded option bit is set
    pub fn is_guarded(&self) -> bool {
        self.options & TRANSACTION_OPTIONS_GUARDED != 0
    }

    /// Whether the sender signature is present
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Sign as the sender
    pub async fn sign(&mut self, signer: &dyn Signer) -> Result<(), SdkError> {
        if signer.address() != self.sender {
            return Err(SdkError::TxBuild(format!(
                "signer {} is not the sender {}",
                signer.address(),
                self.sender
            )));
        }
        let payload = self.serialize_for_signing()?;
        self.signature = Some(signer.sign(&payload).await?);
        Ok(())
    }

    /// Co-sign as the guardian
    pub async fn sign_as_guardian(&mut self, guardian: &dyn Signer) -> Result<(), SdkError> {
        if self.guardian != Some(guardian.address()) {
            return Err(SdkError::TxBuild(format!(
                "{} is not the guardian of this transaction",
                guardian.address()
            )));
        }
        let payload = self.serialize_for_signing()?;
        self.guardian_signature = Some(guardian.sign(&payload).await?);
        Ok(())
    }

    /// Gas the payload alone requires, surcharge included when guarded
    pub fn data_gas(&self, config: &NetworkConfig) -> u64 {
        compute_data_gas(config, self.data.len(), self.is_guarded())
    }

    /// Fee paid if the whole gas limit is consumed.
    ///
    /// Gas covering the payload is paid at full price; the remainder is
    /// discounted by the gas price modifier.
    pub fn compute_fee(&self, config: &NetworkConfig) -> Result<BigUint, SdkError> {
        let data_gas = self.data_gas(config);
        if data_gas > self.gas_limit {
            return Err(SdkError::InsufficientGas {
                required: data_gas,
                limit: self.gas_limit,
            });
        }
        let price = BigUint::from(self.gas_price);
        let full = BigUint::from(data_gas) * &price;
        let processing = BigUint::from(self.gas_limit - data_gas)
            * &price
            * BigUint::from(config.gas_price_modifier.micros())
            / BigUint::from(GasPriceModifier::SCALE);
        Ok(full + processing)
    }
}

/// `minGasLimit + gasPerDataByte * len`, plus the guarded surcharge
pub fn compute_data_gas(config: &NetworkConfig, data_len: usize, guarded: bool) -> u64 {
    let mut gas = config
        .min_gas_limit
        .saturating_add(config.gas_per_data_byte.saturating_mul(data_len as u64));
    if guarded {
        gas = gas.saturating_add(config.extra_gas_limit_guarded_tx);
    }
    gas
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
    const BOB: &str = "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx";

    fn sample() -> Transaction {
        Transaction {
            nonce: 89,
            value: BigUint::from(0u8),
            receiver: Address::from_bech32(BOB).unwrap(),
            sender: Address::from_bech32(ALICE).unwrap(),
            gas_price: 1_000_000_000,
            gas_limit: 50_000,
            data: Vec::new(),
            chain_id: "D".to_string(),
            version: 1,
            options: 0,
            guardian: None,
            signature: None,
            guardian_signature: None,
        }
    }

    #[test]
    fn test_signing_form_field_order() {
        let mut tx = sample();
        tx.data = b"hello".to_vec();
        let bytes = tx.serialize_for_signing().unwrap();
        let expected = format!(
            r#"{{"nonce":89,"value":"0","receiver":"{}","sender":"{}","gasPrice":1000000000,"gasLimit":50000,"data":"aGVsbG8=","chainID":"D","version":1}}"#,
            BOB, ALICE
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_signing_form_omits_empty_fields() {
        let json = String::from_utf8(sample().serialize_for_signing().unwrap()).unwrap();
        assert!(!json.contains("data"));
        assert!(!json.contains("options"));
        assert!(!json.contains("guardian"));
        assert!(!json.contains("signature"));
    }

    #[test]
    fn test_signing_form_ignores_signature() {
        let mut tx = sample();
        let before = tx.serialize_for_signing().unwrap();
        tx.signature = Some("ab".repeat(64));
        assert_eq!(tx.serialize_for_signing().unwrap(), before);
        assert_eq!(tx.to_wire_json().unwrap()["signature"], "ab".repeat(64));
    }

    #[test]
    fn test_guarded_fields_in_signing_form() {
        let mut tx = sample();
        tx.version = 2;
        tx.options = TRANSACTION_OPTIONS_GUARDED;
        tx.guardian = Some(Address::from_bech32(BOB).unwrap());
        let json = String::from_utf8(tx.serialize_for_signing().unwrap()).unwrap();
        assert!(json.ends_with(&format!(r#""version":2,"options":2,"guardian":"{}"}}"#, BOB)));
    }

    #[test]
    fn test_fee_plain_transfer() {
        let config = NetworkConfig::default();
        let fee = sample().compute_fee(&config).unwrap();
        assert_eq!(fee, BigUint::from(50_000_000_000_000u64));
    }

    #[test]
    fn test_fee_with_processing_gas() {
        let config = NetworkConfig::default();
        let mut tx = sample();
        tx.data = vec![b'a'; 10];
        tx.gas_limit = 6_065_000;
        // 65000 at full price, 6_000_000 at 1%
        let expected = 65_000u64 * 1_000_000_000 + 6_000_000u64 * 1_000_000_000 / 100;
        assert_eq!(tx.compute_fee(&config).unwrap(), BigUint::from(expected));
    }

    #[test]
    fn test_fee_insufficient_gas() {
        let config = NetworkConfig::default();
        let mut tx = sample();
        tx.data = vec![0u8; 10];
        let err = tx.compute_fee(&config).unwrap_err();
        assert!(matches!(
            err,
            SdkError::InsufficientGas {
                required: 65_000,
                limit: 50_000
            }
        ));
    }

    #[test]
    fn test_data_gas_guarded() {
        let config = NetworkConfig::default();
        assert_eq!(compute_data_gas(&config, 10, false), 65_000);
        assert_eq!(compute_data_gas(&config, 10, true), 115_000);
    }
}
