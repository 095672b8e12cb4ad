//! # inkbridge-sdk
//!
//! Client for wallet-extension accounts and ink! smart contracts on
//! Substrate chains.
//!
//! ## Features
//!
//! - **AppContext**: owns one lazily opened node connection and one lazily
//!   loaded contract metadata document, shared by every call
//! - **ExtensionRegistry**: wallet extensions, their accounts and signers
//! - **CallDispatcher**: read-only queries via `ContractsApi_call` and signed
//!   `Contracts::call` transactions
//! - **Metadata**: ink! v4/v5 metadata parsing and a JSON <-> SCALE codec
//!   driven by the contract's type registry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inkbridge_sdk::{AppContext, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::new(ClientConfig::default());
//!
//!     let contract = "5CR7KXNwZAAHMuUPxRxkUWBRn5YBCxFDGD7MGAaBWR6t1ZJY";
//!     let supply = ctx
//!         .query_contract(contract, "psp22::totalSupply", vec![])
//!         .await?;
//!     println!("Total supply: {}", supply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! Every call resolves to exactly one of: a decoded value, a contract-level
//! error ([`SdkError::Contract`]) or a transport-level error. Use
//! [`SdkError::kind`] to tell them apart.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod app;
pub mod config;
mod connection;
mod contract;
mod dispatcher;
mod error;
pub mod extrinsic;
mod lazy;
pub mod metadata;
pub mod runtime;
mod signer;
mod transport;
pub mod types;
mod weight;
#[cfg(feature = "ws")]
mod ws;

pub use app::{AppContext, AppContextBuilder};
pub use config::{ClientConfig, ContractsPalletConfig, WeightConfig};
pub use connection::{
    Connection, ConnectionProvider, Connector, DefaultConnector, RuntimeVersion, StaticConnector,
};
pub use contract::{ContractHandle, ContractHandleBuilder};
pub use dispatcher::CallDispatcher;
pub use error::{ContractError, ContractErrorKind, ErrorKind, SdkError};
pub use lazy::Lazy;
pub use metadata::{ContractMetadata, MessageSpec};
pub use signer::{Extension, ExtensionRegistry, Signer, SignerPayload, SignerResult};
pub use transport::{
    deserialize_response, MockTransport, RecordedCall, Transport, MOCK_EXTRINSIC_HASH,
    MOCK_GENESIS_HASH,
};
pub use types::{Account, TxStage, TxStatus};
pub use weight::estimate_weight;

#[cfg(feature = "http")]
pub use transport::HttpTransport;
#[cfg(feature = "ws")]
pub use ws::WsTransport;

// Re-export primitives for convenience
pub use inkbridge_primitives::{AccountId32, Balance, Nonce, Weight, H256};
