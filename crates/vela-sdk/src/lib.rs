//! # vela-sdk
//!
//! Rust SDK for smart-contract ledgers with a gateway/proxy HTTP interface.
//!
//! ## Features
//!
//! - **ProxyProvider**: gateway client with a cached network configuration
//! - **Wallet**: key management and signing behind the [`Signer`] trait
//! - **TxBuilder**: fluent transaction construction with gas computation
//! - **SmartContract**: typed queries and call transactions
//! - **TransactionWatcher**: polling until a transaction is final
//! - **ABI**: binary codec for contract arguments and results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vela_sdk::{Account, ProxyProvider, TransactionWatcher, TransferBuilder, Wallet};
//! use vela_sdk::Address;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ProxyProvider::connect("https://devnet-gateway.multiversx.com");
//!
//!     let (wallet, _phrase) = Wallet::generate()?;
//!     let mut account = Account::new(*wallet.address());
//!     account.sync_from_network(&provider).await?;
//!
//!     let config = provider.network_config().await?;
//!     let bob = Address::from_bech32("erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx")?;
//!     let mut tx = TransferBuilder::new(config, &account, bob)
//!         .value(1_000_000_000_000_000u64)
//!         .build()?;
//!     account.sign_transaction(&mut tx, &wallet).await?;
//!
//!     let hash = provider.send_transaction(&tx).await?;
//!
//!     let executed = TransactionWatcher::new(&provider).await_executed(&hash).await?;
//!     println!("{} {}", executed.hash, executed.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Contract Interaction
//!
//! ```rust,no_run
//! use vela_sdk::abi::{TypeValue, Value};
//! use vela_sdk::contract::{EndpointDefinition, SmartContract};
//! use vela_sdk::{Address, ProxyProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ProxyProvider::connect("https://devnet-gateway.multiversx.com");
//!     let address = Address::from_bech32("erd1qqqqqqqqqqqqqpgqfzydqmdw7m2vazsp6u5p95yxz76t2p9rd8ss0zp9ts")?;
//!
//!     let adder = SmartContract::new(address)
//!         .with_endpoint(EndpointDefinition::new("getSum", vec![], vec![TypeValue::big_uint()]));
//!
//!     let sum = adder.query(&provider, "getSum", &[]).await?;
//!     println!("sum: {}", sum.as_big_uint()?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod account;
mod client;
pub mod contract;
mod error;
mod transaction;
mod transport;
mod tx_builder;
pub mod types;
mod wallet;
pub mod watcher;

// Re-export main types
pub use account::Account;
pub use client::{ApiFlavor, ProxyProvider};
pub use error::SdkError;
pub use transaction::{
    compute_data_gas, Transaction, TRANSACTION_OPTIONS_GUARDED, TRANSACTION_VERSION_DEFAULT,
    TRANSACTION_VERSION_WITH_OPTIONS,
};
pub use transport::{envelope, MockTransport, RecordedRequest};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use tx_builder::{
    compute_gas_limit_contract_call, compute_gas_limit_transfer, ContractCallBuilder, TxBuilder,
    TransferBuilder, EXTRA_GAS_LIMIT_FOR_SC_CALL,
};
pub use wallet::{Signer, Wallet};
pub use watcher::TransactionWatcher;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use vela_primitives::{Address, BigUint, Gas, Nonce, Token, TokenAmount};
