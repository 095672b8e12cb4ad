//! Contract handles

use inkbridge_primitives::AccountId32;
use serde_json::Value;
use std::sync::Arc;

use crate::connection::{Connection, ConnectionProvider};
use crate::metadata::{ContractMetadata, MessageSpec, MetadataProvider};
use crate::SdkError;

/// A deployed contract bound to a connection and its metadata.
///
/// Cheap to build; one is created per call.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: String,
    metadata: Arc<ContractMetadata>,
    connection: Arc<Connection>,
}

impl ContractHandle {
    /// Combine the parts of a handle
    pub fn new(
        address: impl Into<String>,
        metadata: Arc<ContractMetadata>,
        connection: Arc<Connection>,
    ) -> Self {
        Self {
            address: address.into(),
            metadata,
            connection,
        }
    }

    /// Contract address as given
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Contract account; fails for a malformed address
    pub fn account_id(&self) -> Result<AccountId32, SdkError> {
        Ok(self.address.parse::<AccountId32>()?)
    }

    /// Contract metadata
    pub fn metadata(&self) -> &ContractMetadata {
        &self.metadata
    }

    /// Node connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Message descriptor by label or identifier
    pub fn message(&self, name: &str) -> Result<&MessageSpec, SdkError> {
        self.metadata.message(name)
    }

    /// Selector plus encoded arguments for `message`
    pub fn encode_call(&self, message: &MessageSpec, args: &[Value]) -> Result<Vec<u8>, SdkError> {
        self.metadata.encode_call(message, args)
    }
}

/// Builds [`ContractHandle`]s from the shared connection and metadata
#[derive(Debug, Clone)]
pub struct ContractHandleBuilder {
    connections: Arc<ConnectionProvider>,
    metadata: Arc<MetadataProvider>,
}

impl ContractHandleBuilder {
    /// Builder over the given providers
    pub fn new(connections: Arc<ConnectionProvider>, metadata: Arc<MetadataProvider>) -> Self {
        Self {
            connections,
            metadata,
        }
    }

    /// Handle for the contract at `address`.
    ///
    /// Only emptiness is checked here; a malformed address surfaces when the
    /// call is put on the wire.
    pub async fn build(&self, address: &str) -> Result<ContractHandle, SdkError> {
        if address.trim().is_empty() {
            return Err(SdkError::EmptyAddress);
        }
        let connection = self.connections.connection().await?;
        let metadata = self.metadata.metadata().await?;
        Ok(ContractHandle::new(address, metadata, connection))
    }
}
