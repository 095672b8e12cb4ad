//! Wallet extensions and their signers

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::types::Account;
use crate::SdkError;

/// Transaction fields handed to a wallet for signing.
///
/// Field names and hex formatting follow the `SignerPayloadJSON` shape wallet
/// extensions expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerPayload {
    /// Signing account (SS58)
    pub address: String,
    /// Checkpoint block hash; the genesis hash for immortal transactions
    pub block_hash: String,
    /// Checkpoint block number
    pub block_number: String,
    /// Encoded era
    pub era: String,
    /// Genesis hash
    pub genesis_hash: String,
    /// Encoded call
    pub method: String,
    /// Account nonce
    pub nonce: String,
    /// Runtime spec version
    pub spec_version: String,
    /// Tip
    pub tip: String,
    /// Transaction format version
    pub transaction_version: String,
    /// Signed extensions the runtime expects
    pub signed_extensions: Vec<String>,
    /// Extrinsic format version
    pub version: u8,
}

/// Signature returned by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerResult {
    /// Request id assigned by the wallet
    #[serde(default)]
    pub id: u64,
    /// Hex signature, including the signature type byte
    pub signature: String,
    /// Complete signed extrinsic, when the wallet built one
    #[serde(default)]
    pub signed_transaction: Option<String>,
}

/// Signing capability exposed by a wallet extension
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign an arbitrary JSON payload
    async fn sign_payload(&self, payload: &Value) -> Result<SignerResult, SdkError>;

    /// Sign a transaction payload
    async fn sign_transaction(&self, payload: &SignerPayload) -> Result<SignerResult, SdkError> {
        let value = serde_json::to_value(payload)?;
        self.sign_payload(&value).await
    }
}

/// A locally installed wallet extension
#[async_trait]
pub trait Extension: Send + Sync {
    /// Extension identifier, used as the account `source`
    fn name(&self) -> &str;

    /// Ask the extension to authorize `origin`
    async fn enable(&self, origin: &str) -> Result<(), SdkError>;

    /// Accounts the extension exposes
    async fn accounts(&self) -> Result<Vec<Account>, SdkError>;

    /// Signer, if the extension can sign
    fn signer(&self) -> Option<Arc<dyn Signer>>;
}

/// Installed wallet extensions, keyed by name
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: RwLock<Vec<Arc<dyn Extension>>>,
}

impl ExtensionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension, replacing any with the same name
    pub fn register(&self, extension: Arc<dyn Extension>) {
        let mut extensions = self.extensions.write();
        extensions.retain(|e| e.name() != extension.name());
        tracing::debug!(name = extension.name(), "registered wallet extension");
        extensions.push(extension);
    }

    /// Names of registered extensions
    pub fn names(&self) -> Vec<String> {
        self.extensions
            .read()
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    fn get(&self, source: &str) -> Option<Arc<dyn Extension>> {
        self.extensions
            .read()
            .iter()
            .find(|e| e.name() == source)
            .cloned()
    }

    /// Signer of the extension named `source`
    pub fn signer(&self, source: &str) -> Option<Arc<dyn Signer>> {
        self.get(source)?.signer()
    }

    /// Enable every extension for `app_name` and collect their accounts
    pub async fn get_accounts(&self, app_name: &str) -> Result<Vec<Account>, SdkError> {
        let extensions: Vec<_> = self.extensions.read().clone();
        let mut accounts = Vec::new();

        for extension in extensions {
            let name = extension.name().to_string();
            extension.enable(app_name).await.map_err(|e| match e {
                SdkError::ResourceUnavailable(_) => e,
                other => SdkError::ResourceUnavailable(format!(
                    "failed to enable extension {}: {}",
                    name, other
                )),
            })?;

            let found = extension.accounts().await?;
            tracing::debug!(extension = %name, count = found.len(), "fetched accounts");
            accounts.extend(found.into_iter().map(|account| Account {
                source: name.clone(),
                ..account
            }));
        }

        Ok(accounts)
    }

    /// Sign a JSON payload with the signer of `source`.
    ///
    /// The payload is parsed before any signer is touched; `address` is filled
    /// in when the payload object does not carry one.
    pub async fn sign_payload(
        &self,
        payload: &str,
        source: &str,
        address: &str,
    ) -> Result<String, SdkError> {
        let mut value: Value =
            serde_json::from_str(payload).map_err(|e| SdkError::InvalidPayload(e.to_string()))?;

        if let Value::Object(map) = &mut value {
            map.entry("address")
                .or_insert_with(|| Value::String(address.to_string()));
        }

        let signer = self
            .signer(source)
            .ok_or_else(|| SdkError::SignerUnavailable(source.to_string()))?;

        let result = signer.sign_payload(&value).await?;
        Ok(result.signature)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.names())
            .finish()
    }
}
