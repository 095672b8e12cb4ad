//! Application context

use serde_json::Value;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionProvider, Connector, DefaultConnector};
use crate::contract::ContractHandleBuilder;
use crate::dispatcher::CallDispatcher;
use crate::metadata::{loader_for, ContractMetadata, MetadataLoader, MetadataProvider};
use crate::signer::{Extension, ExtensionRegistry};
use crate::types::{Account, TxStatus};
use crate::SdkError;

const PSP22_TOTAL_SUPPLY: &str = "PSP22::total_supply";
const PSP22_BALANCE_OF: &str = "PSP22::balance_of";
const PSP22_TRANSFER: &str = "PSP22::transfer";

/// Owns the lazily created connection, metadata and wallet extensions of
/// one application, and exposes the public call surface.
#[derive(Debug)]
pub struct AppContext {
    config: Arc<ClientConfig>,
    connections: Arc<ConnectionProvider>,
    metadata: Arc<MetadataProvider>,
    extensions: Arc<ExtensionRegistry>,
    dispatcher: CallDispatcher,
}

impl AppContext {
    /// Context using the default connector and the configured metadata location
    pub fn new(config: ClientConfig) -> Self {
        AppContextBuilder::new(config).build()
    }

    /// Start configuring a context
    pub fn builder(config: ClientConfig) -> AppContextBuilder {
        AppContextBuilder::new(config)
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Installed wallet extensions
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Install a wallet extension
    pub fn register_extension(&self, extension: Arc<dyn Extension>) {
        self.extensions.register(extension);
    }

    /// The shared node connection
    pub async fn connection(&self) -> Result<Arc<Connection>, SdkError> {
        self.connections.connection().await
    }

    /// The shared contract metadata
    pub async fn metadata(&self) -> Result<Arc<ContractMetadata>, SdkError> {
        self.metadata.metadata().await
    }

    /// Accounts of every installed extension, tagged with their source
    pub async fn get_accounts(&self) -> Result<Vec<Account>, SdkError> {
        self.extensions.get_accounts(&self.config.app_name).await
    }

    /// Sign a JSON payload with the wallet at `source`, returning the signature
    pub async fn sign_payload(
        &self,
        payload: &str,
        source: &str,
        address: &str,
    ) -> Result<String, SdkError> {
        self.extensions.sign_payload(payload, source, address).await
    }

    /// Dry-run a contract message
    pub async fn query_contract(
        &self,
        address: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, SdkError> {
        self.dispatcher.query(address, function, &args).await
    }

    /// Sign and submit a contract message
    pub async fn execute_contract_function(
        &self,
        address: &str,
        source: &str,
        sender: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxStatus, SdkError> {
        self.dispatcher
            .execute(address, source, sender, function, &args)
            .await
    }

    /// PSP22 total supply
    pub async fn total_supply(&self, contract: &str) -> Result<u128, SdkError> {
        let value = self.query_contract(contract, PSP22_TOTAL_SUPPLY, vec![]).await?;
        parse_balance(&value)
    }

    /// PSP22 balance of `owner`
    pub async fn balance_of(&self, contract: &str, owner: &str) -> Result<u128, SdkError> {
        let value = self
            .query_contract(contract, PSP22_BALANCE_OF, vec![Value::String(owner.to_string())])
            .await?;
        parse_balance(&value)
    }

    /// PSP22 transfer of `amount` from `sender` to `to`
    pub async fn transfer_tokens(
        &self,
        contract: &str,
        source: &str,
        sender: &str,
        to: &str,
        amount: u128,
    ) -> Result<TxStatus, SdkError> {
        let args = vec![
            Value::String(to.to_string()),
            Value::String(amount.to_string()),
            Value::String("0x".to_string()),
        ];
        self.execute_contract_function(contract, source, sender, PSP22_TRANSFER, args)
            .await
    }
}

fn parse_balance(value: &Value) -> Result<u128, SdkError> {
    value
        .as_str()
        .and_then(|s| s.parse::<u128>().ok())
        .ok_or_else(|| SdkError::Decode(format!("expected a balance, got {}", value)))
}

/// Fluent construction of an [`AppContext`]
pub struct AppContextBuilder {
    config: ClientConfig,
    connector: Option<Arc<dyn Connector>>,
    loader: Option<Arc<dyn MetadataLoader>>,
    extensions: Option<Arc<ExtensionRegistry>>,
}

impl AppContextBuilder {
    /// Builder with defaults derived from `config`
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            connector: None,
            loader: None,
            extensions: None,
        }
    }

    /// Open node connections through `connector`
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Load metadata through `loader`
    pub fn metadata_loader(mut self, loader: Arc<dyn MetadataLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Use an existing extension registry
    pub fn extensions(mut self, extensions: Arc<ExtensionRegistry>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Install a wallet extension
    pub fn extension(mut self, extension: Arc<dyn Extension>) -> Self {
        self.extensions
            .get_or_insert_with(|| Arc::new(ExtensionRegistry::new()))
            .register(extension);
        self
    }

    /// Finish building; nothing is connected or loaded yet
    pub fn build(self) -> AppContext {
        let config = Arc::new(self.config);
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(DefaultConnector) as Arc<dyn Connector>);
        let loader = self
            .loader
            .unwrap_or_else(|| loader_for(&config.metadata));

        let connections = Arc::new(ConnectionProvider::new(config.rpc_url.clone(), connector));
        let metadata = Arc::new(MetadataProvider::new(loader));
        let extensions = self.extensions.unwrap_or_default();
        let handles = ContractHandleBuilder::new(connections.clone(), metadata.clone());
        let dispatcher = CallDispatcher::new(config.clone(), handles, extensions.clone());

        AppContext {
            config,
            connections,
            metadata,
            extensions,
            dispatcher,
        }
    }
}
