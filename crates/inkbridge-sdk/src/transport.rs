//! Transport layer for RPC communication

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Genesis hash served by [`MockTransport`] for `chain_getBlockHash`
pub const MOCK_GENESIS_HASH: &str =
    "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3";

/// Extrinsic hash served by [`MockTransport`] for `author_submitExtrinsic`
pub const MOCK_EXTRINSIC_HASH: &str =
    "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// RPC method name
    pub method: String,
    /// Positional params
    pub params: Vec<Value>,
}

/// Mock transport for testing
///
/// Serves canned responses per method and records every request it receives.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Result<Value, SdkError>>>>,
    default_responses: Arc<HashMap<String, Value>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert("system_accountNextIndex".to_string(), Value::from(0u64));
        defaults.insert(
            "chain_getBlockHash".to_string(),
            Value::String(MOCK_GENESIS_HASH.to_string()),
        );
        defaults.insert(
            "state_getRuntimeVersion".to_string(),
            serde_json::json!({
                "specName": "substrate-contracts-node",
                "implName": "substrate-contracts-node",
                "specVersion": 100,
                "transactionVersion": 1,
            }),
        );
        defaults.insert(
            "author_submitExtrinsic".to_string(),
            Value::String(MOCK_EXTRINSIC_HASH.to_string()),
        );
        defaults.insert(
            "system_chain".to_string(),
            Value::String("Development".to_string()),
        );

        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(defaults),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a mock response for a specific method
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .insert(method.to_string(), Ok(response));
    }

    /// Make a method fail with `error`
    pub fn set_error(&self, method: &str, error: SdkError) {
        self.responses
            .lock()
            .insert(method.to_string(), Err(error));
    }

    /// Clear custom responses
    pub fn clear_responses(&self) {
        self.responses.lock().clear();
    }

    /// Every request received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of requests received for `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    /// Params of the most recent request for `method`
    pub fn last_params(&self, method: &str) -> Option<Vec<Value>> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|call| call.method == method)
            .map(|call| call.params.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            params,
        });

        // Check custom responses first
        let custom_response = self.responses.lock().get(method).cloned();
        if let Some(response) = custom_response {
            return response;
        }

        if let Some(response) = self.default_responses.get(method) {
            return Ok(response.clone());
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, serde::Deserialize)]
pub(crate) struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, serde::Deserialize)]
pub(crate) struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Convert into the call result
    pub(crate) fn into_result(self) -> Result<Value, SdkError> {
        if let Some(error) = self.error {
            let message = match error.data {
                Some(Value::String(data)) => format!("{}: {}", error.message, data),
                Some(data) if !data.is_null() => format!("{}: {}", error.message, data),
                _ => error.message,
            };
            return Err(SdkError::Rpc {
                code: error.code,
                message,
            });
        }

        // `null` is a legitimate result for some methods
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Build a JSON-RPC 2.0 request body
pub(crate) fn request_body(id: u64, method: &str, params: Vec<Value>) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let request = request_body(self.next_id(), method, params);
        tracing::trace!(%method, url = %self.url, "http rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        response.into_result()
    }
}
