//! Common SDK types

use inkbridge_primitives::{Nonce, H256};
use serde::{Deserialize, Serialize};

/// An account exposed by a wallet extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Human-readable name set in the wallet
    pub name: Option<String>,
    /// Extension the account came from
    pub source: String,
    /// Key type, e.g. `sr25519`
    #[serde(rename = "type")]
    pub ty: Option<String>,
    /// SS58 address
    pub address: String,
}

/// How far a submitted transaction got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStage {
    /// Accepted into the node's transaction pool
    Broadcast,
    /// Included in a block
    InBlock,
    /// Included in a finalized block
    Finalized,
}

/// Result of submitting a contract transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxStatus {
    /// Whether the node accepted the transaction
    pub success: bool,
    /// Stage reached when the call returned
    pub stage: TxStage,
    /// Extrinsic hash
    pub tx_hash: H256,
    /// Nonce the transaction was signed with
    pub nonce: Nonce,
}
