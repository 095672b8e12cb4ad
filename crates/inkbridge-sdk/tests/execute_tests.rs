//! Signed contract transactions against a mock node

mod common;

use async_trait::async_trait;
use common::*;
use inkbridge_sdk::metadata::StaticMetadataLoader;
use inkbridge_sdk::{
    Account, AppContext, ClientConfig, ErrorKind, Extension, MockTransport, SdkError, Signer,
    SignerResult, StaticConnector, TxStage, H256, MOCK_EXTRINSIC_HASH,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;

/// Log sink handed to a fmt subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_execute_transfer() {
    let transport = MockTransport::new();
    transport.set_response("system_accountNextIndex", json!(5));
    let (wallet, signer) = TestWallet::with_signer("wallet-x");
    let ctx = context(&transport);
    ctx.register_extension(wallet);

    let status = ctx
        .execute_contract_function(
            CONTRACT,
            "wallet-x",
            ALICE,
            "transfer",
            vec![json!(BOB), json!(500)],
        )
        .await
        .unwrap();

    assert!(status.success);
    assert_eq!(status.stage, TxStage::Broadcast);
    assert_eq!(status.nonce, 5);
    assert_eq!(status.tx_hash, H256::from_hex(MOCK_EXTRINSIC_HASH).unwrap());

    let seen = signer.seen.lock();
    assert_eq!(seen.len(), 1);
    let payload = &seen[0];
    assert_eq!(payload["address"], ALICE);
    assert_eq!(payload["nonce"], "0x00000005");
    assert_eq!(payload["specVersion"], "0x00000064");
    assert_eq!(payload["transactionVersion"], "0x00000001");
    assert_eq!(payload["era"], "0x00");
    // Contracts::call with the transfer selector in its data
    let method = payload["method"].as_str().unwrap();
    assert!(method.starts_with("0x080600"));
    assert!(method.contains("84a15da1"));

    assert_eq!(transport.call_count("author_submitExtrinsic"), 1);
    let params = transport.last_params("author_submitExtrinsic").unwrap();
    let extrinsic = hex::decode(params[0].as_str().unwrap().trim_start_matches("0x")).unwrap();
    // two-byte length prefix, then the signed v4 marker and the sender
    assert_eq!(extrinsic[2], 0x84);
    assert_eq!(
        hex::encode(&extrinsic[4..36]),
        "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
    );
}

#[tokio::test]
async fn test_execute_psp22_transfer_helper() {
    let transport = MockTransport::new();
    let (wallet, signer) = TestWallet::with_signer("wallet-x");
    let ctx = context(&transport);
    ctx.register_extension(wallet);

    let status = ctx
        .transfer_tokens(CONTRACT, "wallet-x", ALICE, BOB, 1_000)
        .await
        .unwrap();
    assert!(status.success);
    assert_eq!(status.nonce, 0);

    let method = signer.seen.lock()[0]["method"].as_str().unwrap().to_string();
    assert!(method.contains("db20f9f5"));
}

#[tokio::test]
async fn test_execute_without_signer() {
    let transport = MockTransport::new();
    let ctx = context(&transport);
    ctx.register_extension(TestWallet::without_signer("wallet-x"));

    let err = ctx
        .execute_contract_function(
            CONTRACT,
            "wallet-x",
            ALICE,
            "transfer",
            vec![json!(BOB), json!(500)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::SignerUnavailable(ref source) if source == "wallet-x"));
    assert_eq!(err.kind(), ErrorKind::SignerUnavailable);
    assert_eq!(transport.call_count("author_submitExtrinsic"), 0);
    assert_eq!(transport.call_count("system_accountNextIndex"), 0);
}

#[tokio::test]
async fn test_execute_unknown_source() {
    let transport = MockTransport::new();
    let ctx = context(&transport);

    let err = ctx
        .execute_contract_function(
            CONTRACT,
            "no-such-wallet",
            ALICE,
            "transfer",
            vec![json!(BOB), json!(500)],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignerUnavailable);
    assert_eq!(transport.call_count("author_submitExtrinsic"), 0);
}

#[tokio::test]
async fn test_execute_unknown_function() {
    let transport = MockTransport::new();
    let (wallet, signer) = TestWallet::with_signer("wallet-x");
    let ctx = context(&transport);
    ctx.register_extension(wallet);

    let err = ctx
        .execute_contract_function(CONTRACT, "wallet-x", ALICE, "burn", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::UnknownFunction(_)));
    assert!(signer.seen.lock().is_empty());
}

#[tokio::test]
async fn test_execute_rejected_by_pool() {
    let transport = MockTransport::new();
    transport.set_error(
        "author_submitExtrinsic",
        SdkError::Rpc {
            code: 1010,
            message: "Invalid Transaction".to_string(),
        },
    );
    let (wallet, _signer) = TestWallet::with_signer("wallet-x");
    let ctx = context(&transport);
    ctx.register_extension(wallet);

    let err = ctx
        .execute_contract_function(
            CONTRACT,
            "wallet-x",
            ALICE,
            "transfer",
            vec![json!(BOB), json!(500)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: 1010, .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

struct PrebuiltSigner;

#[async_trait]
impl Signer for PrebuiltSigner {
    async fn sign_payload(&self, _payload: &Value) -> Result<SignerResult, SdkError> {
        Ok(SignerResult {
            id: 1,
            signature: format!("0x01{}", "cd".repeat(64)),
            signed_transaction: Some("0xdeadbeef".to_string()),
        })
    }
}

struct PrebuiltWallet;

#[async_trait]
impl Extension for PrebuiltWallet {
    fn name(&self) -> &str {
        "prebuilt"
    }

    async fn enable(&self, _origin: &str) -> Result<(), SdkError> {
        Ok(())
    }

    async fn accounts(&self) -> Result<Vec<Account>, SdkError> {
        Ok(vec![])
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        Some(Arc::new(PrebuiltSigner))
    }
}

#[tokio::test]
async fn test_execute_submits_wallet_built_extrinsic() {
    let transport = MockTransport::new();
    let ctx = AppContext::builder(ClientConfig::default())
        .connector(Arc::new(StaticConnector::new(transport.clone())))
        .metadata_loader(Arc::new(StaticMetadataLoader::new(PSP22_METADATA)))
        .extension(Arc::new(PrebuiltWallet))
        .build();

    ctx.execute_contract_function(
        CONTRACT,
        "prebuilt",
        ALICE,
        "transfer",
        vec![json!(BOB), json!(500)],
    )
    .await
    .unwrap();

    let params = transport.last_params("author_submitExtrinsic").unwrap();
    assert_eq!(params[0], "0xdeadbeef");
}

#[tokio::test]
async fn test_execute_read_only_message_warns() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let transport = MockTransport::new();
    let (wallet, _signer) = TestWallet::with_signer("wallet-x");
    let ctx = context(&transport);
    ctx.register_extension(wallet);

    let status = ctx
        .execute_contract_function(CONTRACT, "wallet-x", ALICE, "PSP22::total_supply", vec![])
        .await
        .unwrap();
    assert!(status.success);

    let text = logs.text();
    assert!(text.contains("WARN"), "{}", text);
    assert!(text.contains("submitting a read-only message as a transaction"));
    assert!(text.contains("PSP22::total_supply"));
}
