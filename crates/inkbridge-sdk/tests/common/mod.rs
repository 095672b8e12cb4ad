//! Shared helpers for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use inkbridge_scale::Encode;
use inkbridge_sdk::runtime::{
    ContractExecResult, DispatchError, ExecReturnValue, StorageDeposit, FLAG_REVERT,
};
use inkbridge_sdk::metadata::StaticMetadataLoader;
use inkbridge_sdk::{
    Account, AppContext, ClientConfig, Extension, MockTransport, SdkError, Signer, SignerResult,
    StaticConnector, Weight,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

pub const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
pub const CONTRACT: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

pub const PSP22_METADATA: &str = include_str!("../fixtures/psp22_token.json");

pub fn fixture_path() -> String {
    format!(
        "{}/tests/fixtures/psp22_token.json",
        env!("CARGO_MANIFEST_DIR")
    )
}

/// Signer that records what it is asked to sign
#[derive(Default)]
pub struct RecordingSigner {
    pub seen: Mutex<Vec<Value>>,
}

#[async_trait]
impl Signer for RecordingSigner {
    async fn sign_payload(&self, payload: &Value) -> Result<SignerResult, SdkError> {
        self.seen.lock().push(payload.clone());
        Ok(SignerResult {
            id: self.seen.lock().len() as u64,
            signature: format!("0x01{}", "ab".repeat(64)),
            signed_transaction: None,
        })
    }
}

/// In-process wallet extension
pub struct TestWallet {
    pub name: &'static str,
    pub signer: Option<Arc<RecordingSigner>>,
}

impl TestWallet {
    pub fn with_signer(name: &'static str) -> (Arc<Self>, Arc<RecordingSigner>) {
        let signer = Arc::new(RecordingSigner::default());
        let wallet = Arc::new(Self {
            name,
            signer: Some(signer.clone()),
        });
        (wallet, signer)
    }

    pub fn without_signer(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name, signer: None })
    }
}

#[async_trait]
impl Extension for TestWallet {
    fn name(&self) -> &str {
        self.name
    }

    async fn enable(&self, _origin: &str) -> Result<(), SdkError> {
        Ok(())
    }

    async fn accounts(&self) -> Result<Vec<Account>, SdkError> {
        Ok(vec![Account {
            name: Some("Alice".to_string()),
            source: String::new(),
            ty: Some("sr25519".to_string()),
            address: ALICE.to_string(),
        }])
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.signer.clone().map(|s| s as Arc<dyn Signer>)
    }
}

/// Context over a mock node and the PSP22 fixture
pub fn context(transport: &MockTransport) -> AppContext {
    AppContext::builder(ClientConfig::default())
        .connector(Arc::new(StaticConnector::new(transport.clone())))
        .metadata_loader(Arc::new(StaticMetadataLoader::new(PSP22_METADATA)))
        .build()
}

fn exec_result(result: Result<ExecReturnValue, DispatchError>, debug: &str) -> Value {
    let exec = ContractExecResult {
        gas_consumed: Weight::from_parts(1_000_000, 16_384),
        gas_required: Weight::from_parts(2_000_000, 32_768),
        storage_deposit: StorageDeposit::Charge(0),
        debug_message: debug.as_bytes().to_vec(),
        result,
    };
    Value::String(format!("0x{}", hex::encode(exec.encode())))
}

/// `state_call` response for a successful message returning `data`
pub fn exec_ok(data: Vec<u8>) -> Value {
    exec_result(Ok(ExecReturnValue { flags: 0, data }), "")
}

/// `state_call` response for a reverted message returning `data`
pub fn exec_reverted(data: Vec<u8>, debug: &str) -> Value {
    exec_result(
        Ok(ExecReturnValue {
            flags: FLAG_REVERT,
            data,
        }),
        debug,
    )
}

/// `state_call` response for a call the runtime refused
pub fn exec_dispatch_error(error: DispatchError) -> Value {
    exec_result(Err(error), "")
}

/// `MessageResult::Ok` wrapping a `u128`
pub fn ok_balance(amount: u128) -> Vec<u8> {
    let mut data = vec![0u8];
    amount.encode_to(&mut data);
    data
}
