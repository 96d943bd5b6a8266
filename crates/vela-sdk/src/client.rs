//! ProxyProvider - gateway client

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use vela_primitives::Address;

use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{
    AccountOnNetwork, GuardianData, NetworkConfig, QueryRequest, QueryResponse,
    TransactionOnNetwork,
};
use crate::{SdkError, Transaction};

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Envelope code of a successful gateway response
const SUCCESS_CODE: &str = "successful";

/// Shape of the responses returned by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFlavor {
    /// Gateway: `{code, data, error}` envelope around every resource
    #[default]
    Proxy,
    /// API: resources returned directly
    Api,
}

/// Client for a gateway or API endpoint
pub struct ProxyProvider {
    transport: Box<dyn Transport>,
    flavor: ApiFlavor,
    network_config: OnceCell<NetworkConfig>,
}

impl ProxyProvider {
    /// Create a new provider with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self::with_transport(HttpTransport::new(url))
    }

    /// Create a new provider with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a provider with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            flavor: ApiFlavor::Proxy,
            network_config: OnceCell::new(),
        }
    }

    /// Select the response shape
    pub fn with_flavor(mut self, flavor: ApiFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Response shape in use
    pub fn flavor(&self) -> ApiFlavor {
        self.flavor
    }

    /// Pull `field` out of a response, checking the envelope when there is one
    fn unwrap_resource(&self, body: Value, field: &str) -> Result<Value, SdkError> {
        match self.flavor {
            ApiFlavor::Proxy => {
                let code = body.get("code").and_then(Value::as_str).unwrap_or_default();
                if code != SUCCESS_CODE {
                    let message = body
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    return Err(SdkError::Gateway {
                        code: code.to_string(),
                        message,
                    });
                }
                body.get("data")
                    .and_then(|data| data.get(field))
                    .cloned()
                    .ok_or_else(|| {
                        SdkError::Serialization(format!("response has no data.{}", field))
                    })
            }
            ApiFlavor::Api => Ok(match body.get(field) {
                Some(inner) => inner.clone(),
                None => body,
            }),
        }
    }

    async fn get_resource<T: DeserializeOwned>(&self, path: &str, field: &str) -> Result<T, SdkError> {
        tracing::debug!(path, "GET");
        let body = self.transport.get(path).await?;
        deserialize_response(self.unwrap_resource(body, field)?)
    }

    async fn post_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Value,
        field: &str,
    ) -> Result<T, SdkError> {
        tracing::debug!(path, "POST");
        let body = self.transport.post(path, payload).await?;
        deserialize_response(self.unwrap_resource(body, field)?)
    }

    // ==================== Network ====================

    /// Network parameters, fetched on first use and cached
    pub async fn network_config(&self) -> Result<&NetworkConfig, SdkError> {
        self.network_config
            .get_or_try_init(|| self.fetch_network_config())
            .await
    }

    /// Drop the cached network parameters and fetch them again
    pub async fn refetch_network_config(&mut self) -> Result<&NetworkConfig, SdkError> {
        self.network_config.take();
        self.network_config().await
    }

    async fn fetch_network_config(&self) -> Result<NetworkConfig, SdkError> {
        let config: NetworkConfig = self.get_resource("network/config", "config").await?;
        tracing::debug!(chain_id = %config.chain_id, "network config fetched");
        Ok(config)
    }

    // ==================== Accounts ====================

    /// Account nonce and balance
    pub async fn get_account(&self, address: &Address) -> Result<AccountOnNetwork, SdkError> {
        self.get_resource(&format!("address/{}", address.to_bech32()), "account")
            .await
    }

    /// Guardian state of an account
    pub async fn get_guardian_data(&self, address: &Address) -> Result<GuardianData, SdkError> {
        self.get_resource(
            &format!("address/{}/guardian-data", address.to_bech32()),
            "guardianData",
        )
        .await
    }

    // ==================== Transactions ====================

    /// Broadcast a signed transaction, returning its hash
    pub async fn send_transaction(&self, tx: &Transaction) -> Result<String, SdkError> {
        if !tx.is_signed() {
            return Err(SdkError::TxBuild("transaction is not signed".to_string()));
        }
        if tx.is_guarded() && tx.guardian_signature.is_none() {
            return Err(SdkError::TxBuild(
                "guarded transaction lacks the guardian signature".to_string(),
            ));
        }
        let hash: String = self
            .post_resource("transaction/send", tx.to_wire_json()?, "txHash")
            .await?;
        tracing::info!(hash = %hash, nonce = tx.nonce, "transaction sent");
        Ok(hash)
    }

    /// Transaction with its results and logs
    pub async fn get_transaction(&self, hash: &str) -> Result<TransactionOnNetwork, SdkError> {
        let mut tx: TransactionOnNetwork = self
            .get_resource(&format!("transaction/{}?withResults=true", hash), "transaction")
            .await?;
        if tx.hash.is_empty() {
            tx.hash = hash.to_string();
        }
        Ok(tx)
    }

    /// Raw status string of a transaction
    pub async fn get_transaction_status(&self, hash: &str) -> Result<String, SdkError> {
        self.get_resource(&format!("transaction/{}/status", hash), "status")
            .await
    }

    // ==================== Contracts ====================

    /// Run a read-only contract query
    pub async fn query_contract(&self, request: &QueryRequest) -> Result<QueryResponse, SdkError> {
        self.post_resource("vm-values/query", serde_json::to_value(request)?, "data")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::envelope;
    use serde_json::json;

    #[tokio::test]
    async fn test_network_config_cached() {
        let transport = MockTransport::new();
        let provider = ProxyProvider::with_transport(transport.clone());

        let first = provider.network_config().await.unwrap().clone();
        let second = provider.network_config().await.unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.min_gas_limit, 50_000);
        assert_eq!(transport.request_count("network/config"), 1);
    }

    #[tokio::test]
    async fn test_refetch_network_config() {
        let transport = MockTransport::new();
        let mut provider = ProxyProvider::with_transport(transport.clone());
        provider.network_config().await.unwrap();

        transport.set_data(
            "network/config",
            json!({ "config": {
                "erd_chain_id": "T",
                "erd_min_gas_price": 1,
                "erd_min_gas_limit": 1,
                "erd_gas_per_data_byte": 1,
                "erd_gas_price_modifier": "1",
                "erd_min_transaction_version": 1
            }}),
        );
        assert_eq!(provider.network_config().await.unwrap().chain_id, "D");
        assert_eq!(provider.refetch_network_config().await.unwrap().chain_id, "T");
        assert_eq!(transport.request_count("network/config"), 2);
    }

    #[tokio::test]
    async fn test_envelope_error_surfaces() {
        let transport = MockTransport::new();
        transport.set_response(
            "transaction/abc/status",
            json!({ "data": null, "error": "transaction not found", "code": "bad_request" }),
        );
        let provider = ProxyProvider::with_transport(transport);

        let err = provider.get_transaction_status("abc").await.unwrap_err();
        match err {
            SdkError::Gateway { code, message } => {
                assert_eq!(code, "bad_request");
                assert_eq!(message, "transaction not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_flavor_reads_bare_resources() {
        let transport = MockTransport::new();
        transport.set_response("transaction/abc/status", json!({ "status": "success" }));
        let provider = ProxyProvider::with_transport(transport).with_flavor(ApiFlavor::Api);

        assert_eq!(provider.get_transaction_status("abc").await.unwrap(), "success");
    }

    #[tokio::test]
    async fn test_get_transaction_fills_hash() {
        let transport = MockTransport::new();
        transport.set_response(
            "transaction/abc?withResults=true",
            envelope(json!({ "transaction": { "status": "pending" } })),
        );
        let provider = ProxyProvider::with_transport(transport);

        let tx = provider.get_transaction("abc").await.unwrap();
        assert_eq!(tx.hash, "abc");
        assert_eq!(tx.status, "pending");
    }
}
