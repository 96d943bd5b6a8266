//! Transaction builders

use num_bigint::BigUint;
use vela_primitives::Address;

use crate::abi::{encode_call_data, Value};
use crate::transaction::{
    compute_data_gas, TRANSACTION_OPTIONS_GUARDED, TRANSACTION_VERSION_DEFAULT,
    TRANSACTION_VERSION_WITH_OPTIONS,
};
use crate::types::NetworkConfig;
use crate::{Account, SdkError, Transaction};

/// Execution allowance added to every contract call's gas limit
pub const EXTRA_GAS_LIMIT_FOR_SC_CALL: u64 = 6_000_000;

/// Gas limit of a value transfer carrying `data_len` bytes
pub fn compute_gas_limit_transfer(config: &NetworkConfig, data_len: usize, guarded: bool) -> u64 {
    compute_data_gas(config, data_len, guarded)
}

/// Gas limit of a contract call whose call data is `data_len` bytes
pub fn compute_gas_limit_contract_call(
    config: &NetworkConfig,
    data_len: usize,
    guarded: bool,
) -> u64 {
    compute_data_gas(config, data_len, guarded).saturating_add(EXTRA_GAS_LIMIT_FOR_SC_CALL)
}

/// Low-level transaction builder with fluent API.
///
/// Without a network config every field must be given explicitly. With one,
/// the gas price and gas limit get computed defaults and an explicit gas
/// limit is checked against the payload's minimum.
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    config: Option<NetworkConfig>,
    chain_id: Option<String>,
    nonce: Option<u64>,
    sender: Option<Address>,
    receiver: Option<Address>,
    value: BigUint,
    data: Vec<u8>,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    version: Option<u32>,
    guarded: bool,
    guardian: Option<Address>,
    contract_call: bool,
}

impl TxBuilder {
    /// Create a new transaction builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a transaction sent from `account`.
    ///
    /// Snapshots the account's nonce and guardian state at this point.
    pub fn for_account(config: &NetworkConfig, account: &Account) -> Self {
        Self {
            config: Some(config.clone()),
            chain_id: Some(config.chain_id.clone()),
            nonce: Some(account.nonce),
            sender: Some(account.address),
            guarded: account.guarded,
            guardian: account.guardian,
            ..Default::default()
        }
    }

    /// Use network parameters for defaults and checks
    pub fn network_config(mut self, config: &NetworkConfig) -> Self {
        if self.chain_id.is_none() {
            self.chain_id = Some(config.chain_id.clone());
        }
        self.config = Some(config.clone());
        self
    }

    /// Set the chain id
    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Set the sender
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the receiver
    pub fn receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Set the native value, in base units
    pub fn value(mut self, value: impl Into<BigUint>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the payload
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    /// Set the gas price
    pub fn gas_price(mut self, price: u64) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// Force a transaction version
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Mark as guarded and set the guardian
    pub fn guardian(mut self, guardian: Address) -> Self {
        self.guarded = true;
        self.guardian = Some(guardian);
        self
    }

    /// Mark as guarded or not
    pub fn guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    /// Price gas as a contract call
    pub fn contract_call(mut self, contract_call: bool) -> Self {
        self.contract_call = contract_call;
        self
    }

    /// Build the unsigned transaction
    ///
    /// # Errors
    ///
    /// - [`SdkError::GasLimit`] when no gas limit is set and there is no
    ///   network config to compute one
    /// - [`SdkError::InsufficientGas`] when the gas limit is below the
    ///   payload's minimum
    /// - [`SdkError::TxBuild`] for missing fields, or a guarded transaction
    ///   without a guardian
    pub fn build(self) -> Result<Transaction, SdkError> {
        let chain_id = self
            .chain_id
            .ok_or_else(|| SdkError::TxBuild("chain id not set".to_string()))?;
        let nonce = self
            .nonce
            .ok_or_else(|| SdkError::TxBuild("nonce not set".to_string()))?;
        let sender = self
            .sender
            .ok_or_else(|| SdkError::TxBuild("sender not set".to_string()))?;
        let receiver = self
            .receiver
            .ok_or_else(|| SdkError::TxBuild("receiver not set".to_string()))?;
        let gas_price = self
            .gas_price
            .or(self.config.as_ref().map(|c| c.min_gas_price))
            .ok_or_else(|| SdkError::TxBuild("gas price not set".to_string()))?;

        if let Some(config) = self.config.as_ref().filter(|c| gas_price < c.min_gas_price) {
            return Err(SdkError::TxBuild(format!(
                "gas price {} below network minimum {}",
                gas_price, config.min_gas_price
            )));
        }

        let guardian = if self.guarded {
            Some(self.guardian.ok_or_else(|| {
                SdkError::TxBuild("guarded transaction requires a guardian".to_string())
            })?)
        } else {
            None
        };

        let gas_limit = match (&self.config, self.gas_limit) {
            (Some(config), Some(limit)) => {
                let required = compute_data_gas(config, self.data.len(), self.guarded);
                if limit < required {
                    return Err(SdkError::InsufficientGas { required, limit });
                }
                limit
            }
            (Some(config), None) => {
                if self.contract_call {
                    compute_gas_limit_contract_call(config, self.data.len(), self.guarded)
                } else {
                    compute_gas_limit_transfer(config, self.data.len(), self.guarded)
                }
            }
            (None, Some(limit)) => limit,
            (None, None) => {
                return Err(SdkError::GasLimit(
                    "gas limit not set and no network config to compute it".to_string(),
                ))
            }
        };

        let (version, options) = if self.guarded {
            (TRANSACTION_VERSION_WITH_OPTIONS, TRANSACTION_OPTIONS_GUARDED)
        } else {
            (self.version.unwrap_or(TRANSACTION_VERSION_DEFAULT), 0)
        };

        Ok(Transaction {
            nonce,
            value: self.value,
            receiver,
            sender,
            gas_price,
            gas_limit,
            data: self.data,
            chain_id,
            version,
            options,
            guardian,
            signature: None,
            guardian_signature: None,
        })
    }
}

/// Builder for native value transfers
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    inner: TxBuilder,
}

impl TransferBuilder {
    /// Transfer from `account` to `receiver`
    pub fn new(config: &NetworkConfig, account: &Account, receiver: Address) -> Self {
        Self {
            inner: TxBuilder::for_account(config, account).receiver(receiver),
        }
    }

    /// Amount in base units
    pub fn value(mut self, value: impl Into<BigUint>) -> Self {
        self.inner = self.inner.value(value);
        self
    }

    /// Attach a payload, e.g. a note
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.inner = self.inner.data(data);
        self
    }

    /// Override the computed gas limit
    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.inner = self.inner.gas_limit(limit);
        self
    }

    /// Override the network's minimum gas price
    pub fn gas_price(mut self, price: u64) -> Self {
        self.inner = self.inner.gas_price(price);
        self
    }

    /// Build the unsigned transaction
    pub fn build(self) -> Result<Transaction, SdkError> {
        self.inner.build()
    }
}

/// Builder for contract calls
#[derive(Debug, Clone)]
pub struct ContractCallBuilder {
    inner: TxBuilder,
    function: String,
    args: Vec<Value>,
}

impl ContractCallBuilder {
    /// Call `function` on `contract` from `account`
    pub fn new(
        config: &NetworkConfig,
        account: &Account,
        contract: Address,
        function: impl Into<String>,
    ) -> Self {
        Self {
            inner: TxBuilder::for_account(config, account)
                .receiver(contract)
                .contract_call(true),
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    /// Append several arguments
    pub fn args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.args.extend(args);
        self
    }

    /// Native value sent with the call
    pub fn value(mut self, value: impl Into<BigUint>) -> Self {
        self.inner = self.inner.value(value);
        self
    }

    /// Override the computed gas limit
    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.inner = self.inner.gas_limit(limit);
        self
    }

    /// Override the network's minimum gas price
    pub fn gas_price(mut self, price: u64) -> Self {
        self.inner = self.inner.gas_price(price);
        self
    }

    /// The call data this builder will produce
    pub fn call_data(&self) -> Result<String, SdkError> {
        Ok(encode_call_data(&self.function, &self.args)?)
    }

    /// Build the unsigned transaction
    pub fn build(self) -> Result<Transaction, SdkError> {
        let data = self.call_data()?;
        self.inner.data(data.into_bytes()).build()
    }
}
