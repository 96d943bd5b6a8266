//! Transport layer for gateway communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// Transport trait for gateway communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET {base}/{path}` and return the JSON body
    async fn get(&self, path: &str) -> Result<Value, SdkError>;

    /// `POST {base}/{path}` with a JSON body and return the JSON body
    async fn post(&self, path: &str, body: Value) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// A scripted reply
type Reply = Result<Value, String>;

/// Recorded request: path and POST body
pub type RecordedRequest = (String, Option<Value>);

/// Mock transport for testing.
///
/// Answers from a path → response table. A path can also be given a queue
/// of replies; each request pops one and the last reply repeats forever.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    sequences: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a new mock transport with a default `network/config`
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("network/config".to_string(), default_network_config());
        Self {
            responses: Arc::new(Mutex::new(defaults)),
            sequences: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a fixed response for a path
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, path: &str, response: Value) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(path.to_string(), response);
    }

    /// Set a fixed response wrapped in a successful gateway envelope
    pub fn set_data(&self, path: &str, data: Value) {
        self.set_response(path, envelope(data));
    }

    /// Queue a reply for a path, ahead of any fixed response
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_response(&self, path: &str, response: Value) {
        self.sequences
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(path.to_string())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a transport failure for a path
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_error(&self, path: &str, message: &str) {
        self.sequences
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(path.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Queue one `transaction/{hash}/status` reply per status string
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_statuses(&self, hash: &str, statuses: &[&str]) {
        let path = format!("transaction/{}/status", hash);
        for status in statuses {
            self.push_response(&path, envelope(serde_json::json!({ "status": status })));
        }
    }

    /// Requests seen so far
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Number of requests made to a path
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn request_count(&self, path: &str) -> usize {
        self.requests().iter().filter(|(p, _)| p == path).count()
    }

    /// Clear custom responses and queues
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
        self.sequences
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
    }

    fn reply(&self, path: &str, body: Option<Value>) -> Result<Value, SdkError> {
        self.requests
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((path.to_string(), body));

        // Check queued replies first
        let queued = {
            let mut sequences = self
                .sequences
                .lock()
                .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?;
            match sequences.get_mut(path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        if let Some(reply) = queued {
            return reply.map_err(SdkError::Transport);
        }

        let fixed = self
            .responses
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(path)
            .cloned();

        fixed.ok_or_else(|| SdkError::Http {
            status: 404,
            body: format!("no mock response for {}", path),
        })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Value, SdkError> {
        self.reply(path, None)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, SdkError> {
        self.reply(path, Some(body))
    }
}

/// Wrap data in a successful gateway envelope
pub fn envelope(data: Value) -> Value {
    serde_json::json!({
        "data": data,
        "error": "",
        "code": "successful",
    })
}

fn default_network_config() -> Value {
    envelope(serde_json::json!({
        "config": {
            "erd_chain_id": "D",
            "erd_min_gas_price": 1_000_000_000u64,
            "erd_min_gas_limit": 50_000,
            "erd_gas_per_data_byte": 1_500,
            "erd_gas_price_modifier": "0.01",
            "erd_min_transaction_version": 1,
            "erd_extra_gas_limit_guarded_tx": 50_000,
            "erd_num_shards_without_meta": 3,
        }
    }))
}

/// HTTP transport for real gateway communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read(response: reqwest::Response) -> Result<Value, SdkError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if !status.is_success() {
            // gateways put the reason in the envelope even on 4xx/5xx
            if let Ok(GatewayErrorBody { error, code }) = serde_json::from_str(&body) {
                if !error.is_empty() {
                    return Err(SdkError::Gateway {
                        code,
                        message: error,
                    });
                }
            }
            return Err(SdkError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| SdkError::Serialization(e.to_string()))
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, SdkError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Self::read(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, SdkError> {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Self::read(response).await
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();
        let result = transport.get("network/config").await.unwrap();
        assert_eq!(result["code"], "successful");
        assert_eq!(result["data"]["config"]["erd_chain_id"], "D");
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_data("address/x", serde_json::json!({ "nonce": 5 }));

        let result = transport.get("address/x").await.unwrap();
        assert_eq!(result["data"]["nonce"], 5);
    }

    #[tokio::test]
    async fn test_mock_transport_sequence_repeats_last() {
        let transport = MockTransport::new();
        transport.push_response("p", Value::from(1));
        transport.push_response("p", Value::from(2));

        assert_eq!(transport.get("p").await.unwrap(), Value::from(1));
        assert_eq!(transport.get("p").await.unwrap(), Value::from(2));
        assert_eq!(transport.get("p").await.unwrap(), Value::from(2));
    }

    #[tokio::test]
    async fn test_mock_transport_queued_error() {
        let transport = MockTransport::new();
        transport.push_error("p", "connection reset");
        transport.push_response("p", Value::from(1));

        assert!(matches!(transport.get("p").await, Err(SdkError::Transport(_))));
        assert_eq!(transport.get("p").await.unwrap(), Value::from(1));
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_path() {
        let transport = MockTransport::new();
        let result = transport.get("unknown").await;
        assert!(matches!(result, Err(SdkError::Http { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        transport.set_response("transaction/send", Value::Null);
        transport
            .post("transaction/send", serde_json::json!({ "nonce": 1 }))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1.as_ref().unwrap()["nonce"], 1);
        assert_eq!(transport.request_count("transaction/send"), 1);
    }
}
