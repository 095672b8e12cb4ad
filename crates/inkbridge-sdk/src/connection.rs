//! Node connection and its provider

use async_trait::async_trait;
use inkbridge_primitives::{Nonce, H256};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::lazy::Lazy;
use crate::transport::{deserialize_response, Transport};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;
#[cfg(feature = "ws")]
use crate::ws::WsTransport;

/// Versions a signed extrinsic commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    /// Runtime spec version
    pub spec_version: u32,
    /// Transaction format version
    pub transaction_version: u32,
}

/// One open RPC connection to a node
pub struct Connection {
    url: String,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Wrap an established transport
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            transport,
        }
    }

    /// Endpoint this connection was opened against
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Helper method to make RPC request and deserialize
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    /// Call a runtime API function, returning the raw SCALE result
    pub async fn state_call(&self, function: &str, data: &[u8]) -> Result<Vec<u8>, SdkError> {
        let result: String = self
            .request(
                "state_call",
                vec![
                    Value::String(function.to_string()),
                    Value::String(format!("0x{}", hex::encode(data))),
                ],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    /// Next nonce for `address`, counting transactions in the pool
    pub async fn next_index(&self, address: &str) -> Result<Nonce, SdkError> {
        self.request(
            "system_accountNextIndex",
            vec![Value::String(address.to_string())],
        )
        .await
    }

    /// Hash of block zero
    pub async fn genesis_hash(&self) -> Result<H256, SdkError> {
        let result: String = self
            .request("chain_getBlockHash", vec![Value::from(0u64)])
            .await?;
        Ok(H256::from_hex(&result)?)
    }

    /// Versions of the current runtime
    pub async fn runtime_version(&self) -> Result<RuntimeVersion, SdkError> {
        self.request("state_getRuntimeVersion", vec![]).await
    }

    /// Submit a signed extrinsic to the pool, returning its hash
    pub async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<H256, SdkError> {
        let result: String = self
            .request(
                "author_submitExtrinsic",
                vec![Value::String(format!("0x{}", hex::encode(extrinsic)))],
            )
            .await?;
        Ok(H256::from_hex(&result)?)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("url", &self.url).finish()
    }
}

fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Opens transports to a node
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a transport to `url`
    async fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, SdkError>;
}

/// Picks a transport from the URL scheme
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnector;

#[async_trait]
impl Connector for DefaultConnector {
    async fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, SdkError> {
        let scheme = url.split("://").next().unwrap_or_default();
        match scheme {
            #[cfg(feature = "ws")]
            "ws" | "wss" => Ok(Arc::new(WsTransport::connect(url).await?)),
            #[cfg(feature = "http")]
            "http" | "https" => Ok(Arc::new(HttpTransport::new(url))),
            _ => Err(SdkError::Transport(format!(
                "unsupported endpoint scheme: {}",
                url
            ))),
        }
    }
}

/// Hands out a fixed transport, regardless of URL
#[derive(Clone)]
pub struct StaticConnector {
    transport: Arc<dyn Transport>,
}

impl StaticConnector {
    /// Serve `transport` for every connect
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Serve an already shared transport
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(&self, _url: &str) -> Result<Arc<dyn Transport>, SdkError> {
        Ok(self.transport.clone())
    }
}

/// Owns the single lazily opened connection of an application
pub struct ConnectionProvider {
    inner: Lazy<Connection>,
}

impl ConnectionProvider {
    /// Provider that opens `url` through `connector` on first use
    pub fn new(url: impl Into<String>, connector: Arc<dyn Connector>) -> Self {
        let url: String = url.into();
        Self {
            inner: Lazy::new(move || {
                let url = url.clone();
                let connector = connector.clone();
                async move {
                    tracing::debug!(%url, "opening node connection");
                    let transport = connector.connect(&url).await.map_err(|e| {
                        tracing::error!(%url, err = %e, "node connection failed");
                        e
                    })?;
                    Ok(Connection::new(url, transport))
                }
            }),
        }
    }

    /// The shared connection, opened on first call
    pub async fn connection(&self) -> Result<Arc<Connection>, SdkError> {
        self.inner.get().await
    }

    /// Returns `true` once a connection is open
    pub fn is_connected(&self) -> bool {
        self.inner.is_initialized()
    }
}

impl fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("connected", &self.is_connected())
            .finish()
    }
}
