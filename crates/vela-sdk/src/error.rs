//! SDK error types

use std::time::Duration;

use thiserror::Error;

use crate::abi::AbiError;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Gateway envelope carried an error code
    #[error("Gateway error: {code} - {message}")]
    Gateway {
        /// Envelope code
        code: String,
        /// Envelope error message
        message: String,
    },

    /// No gas limit was set and none could be computed
    #[error("Gas limit error: {0}")]
    GasLimit(String),

    /// Gas limit is below what the data alone requires
    #[error("Insufficient gas: required {required}, limit {limit}")]
    InsufficientGas {
        /// Minimum gas for the payload
        required: u64,
        /// Declared gas limit
        limit: u64,
    },

    /// Transaction build error
    #[error("Transaction build error: {0}")]
    TxBuild(String),

    /// Transaction did not reach a final status in time
    #[error("Transaction {hash} not executed after {waited:?}")]
    Timeout {
        /// Transaction hash
        hash: String,
        /// Time spent waiting
        waited: Duration,
    },

    /// Transaction executed with a failed status
    #[error("Transaction {hash} failed with status {status}")]
    TxFailed {
        /// Transaction hash
        hash: String,
        /// Raw status string
        status: String,
    },

    /// Transaction was rejected as invalid
    #[error("Transaction {hash} is invalid")]
    TxInvalid {
        /// Transaction hash
        hash: String,
    },

    /// A contract result or log carried an error message
    #[error("Contract error in {hash}: {message}")]
    ContractError {
        /// Transaction hash
        hash: String,
        /// Error message from the contract
        message: String,
    },

    /// Query returned a non-ok return code
    #[error("Query failed: {code} - {message}")]
    Query {
        /// Return code
        code: String,
        /// Return message
        message: String,
    },

    /// Codec error
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Key or signature error
    #[error("Crypto error: {0}")]
    Crypto(#[from] vela_crypto::CryptoError),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<vela_primitives::PrimitiveError> for SdkError {
    fn from(e: vela_primitives::PrimitiveError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}
