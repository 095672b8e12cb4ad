//! Client configuration

use inkbridge_primitives::SUBSTRATE_SS58_PREFIX;
use serde::{Deserialize, Serialize};

/// Default node endpoint
pub const DEFAULT_RPC_URL: &str = "ws://127.0.0.1:9944";

/// Default contract metadata location
pub const DEFAULT_METADATA: &str = "y_psp22_token.json";

/// Default application name announced to wallet extensions
pub const DEFAULT_APP_NAME: &str = "inkbridge";

/// Everything an [`AppContext`](crate::AppContext) needs to reach the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node RPC endpoint (`ws`, `wss`, `http` or `https`)
    pub rpc_url: String,
    /// Contract metadata URL or file path
    pub metadata: String,
    /// Name announced when enabling wallet extensions
    pub app_name: String,
    /// Weight limit attached to every call
    pub weight: WeightConfig,
    /// Origin used for read-only queries; defaults to the contract itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_origin: Option<String>,
    /// SS58 prefix used when rendering account ids
    pub ss58_prefix: u16,
    /// Location of the contracts pallet in the runtime
    pub contracts: ContractsPalletConfig,
    /// Signed extensions announced in signer payloads
    pub signed_extensions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            metadata: DEFAULT_METADATA.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            weight: WeightConfig::default(),
            query_origin: None,
            ss58_prefix: SUBSTRATE_SS58_PREFIX,
            contracts: ContractsPalletConfig::default(),
            signed_extensions: default_signed_extensions(),
        }
    }
}

/// Configured upper bound for contract execution weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Computation bound
    pub ref_time: u64,
    /// Proof-size bound
    pub proof_size: u64,
}

impl WeightConfig {
    /// Default computation bound
    pub const DEFAULT_REF_TIME: u64 = 11_344_007_255 - 1;
    /// Default proof-size bound
    pub const DEFAULT_PROOF_SIZE: u64 = 131_072;
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            ref_time: Self::DEFAULT_REF_TIME,
            proof_size: Self::DEFAULT_PROOF_SIZE,
        }
    }
}

/// Indices of `pallet_contracts` and its `call` dispatchable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsPalletConfig {
    /// Pallet index in `construct_runtime!`
    pub pallet_index: u8,
    /// Index of `call` within the pallet
    pub call_index: u8,
}

impl Default for ContractsPalletConfig {
    fn default() -> Self {
        Self {
            pallet_index: 8,
            call_index: 6,
        }
    }
}

fn default_signed_extensions() -> Vec<String> {
    [
        "CheckNonZeroSender",
        "CheckSpecVersion",
        "CheckTxVersion",
        "CheckGenesis",
        "CheckMortality",
        "CheckNonce",
        "CheckWeight",
        "ChargeTransactionPayment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, "ws://127.0.0.1:9944");
        assert_eq!(config.weight.ref_time, 11_344_007_254);
        assert_eq!(config.weight.proof_size, 131_072);
        assert_eq!(config.ss58_prefix, 42);
        assert_eq!(config.contracts.pallet_index, 8);
        assert_eq!(config.signed_extensions.len(), 8);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"rpc_url": "http://node:9933", "weight": {"proof_size": 1}}"#)
                .unwrap();
        assert_eq!(config.rpc_url, "http://node:9933");
        assert_eq!(config.weight.proof_size, 1);
        assert_eq!(config.weight.ref_time, WeightConfig::DEFAULT_REF_TIME);
        assert_eq!(config.metadata, DEFAULT_METADATA);
    }
}
