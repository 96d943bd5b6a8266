//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid secret key or signer selection
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid typed argument or type name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// SDK error
    #[error("{0}")]
    Sdk(#[from] vela_sdk::SdkError),

    /// Cryptographic error
    #[error("{0}")]
    Crypto(#[from] vela_crypto::CryptoError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<vela_sdk::abi::AbiError> for CliError {
    fn from(e: vela_sdk::abi::AbiError) -> Self {
        CliError::Sdk(e.into())
    }
}

impl From<vela_primitives::PrimitiveError> for CliError {
    fn from(e: vela_primitives::PrimitiveError) -> Self {
        CliError::InvalidAddress(e.to_string())
    }
}
