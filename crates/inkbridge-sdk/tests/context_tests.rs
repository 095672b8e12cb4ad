//! Shared resources, accounts and payload signing

mod common;

use async_trait::async_trait;
use common::*;
use futures::future::join_all;
use inkbridge_sdk::metadata::StaticMetadataLoader;
use inkbridge_sdk::{
    AppContext, ClientConfig, Connector, ErrorKind, MockTransport, SdkError, Transport,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Connector that counts connection attempts and can fail the first few
struct CountingConnector {
    transport: MockTransport,
    attempts: AtomicUsize,
    failures: usize,
}

impl CountingConnector {
    fn new(transport: MockTransport, failures: usize) -> Self {
        Self {
            transport,
            attempts: AtomicUsize::new(0),
            failures,
        }
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self, _url: &str) -> Result<Arc<dyn Transport>, SdkError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        if attempt < self.failures {
            return Err(SdkError::Transport("connection refused".to_string()));
        }
        Ok(Arc::new(self.transport.clone()))
    }
}

fn context_with(connector: Arc<CountingConnector>) -> AppContext {
    AppContext::builder(ClientConfig::default())
        .connector(connector)
        .metadata_loader(Arc::new(StaticMetadataLoader::new(PSP22_METADATA)))
        .build()
}

#[tokio::test]
async fn test_concurrent_callers_share_one_connection() {
    let connector = Arc::new(CountingConnector::new(MockTransport::new(), 0));
    let ctx = context_with(connector.clone());

    let connections = join_all((0..8).map(|_| ctx.connection())).await;
    let connections: Vec<_> = connections.into_iter().map(Result::unwrap).collect();

    assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    assert!(connections
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_connection() {
    let transport = MockTransport::new();
    transport.set_response("state_call", exec_ok(ok_balance(1_000_000)));
    let connector = Arc::new(CountingConnector::new(transport.clone(), 0));
    let ctx = context_with(connector.clone());

    let results = join_all((0..4).map(|_| ctx.total_supply(CONTRACT))).await;
    for result in results {
        assert_eq!(result.unwrap(), 1_000_000);
    }
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(transport.call_count("state_call"), 4);
}

#[tokio::test]
async fn test_failed_connection_is_retried_on_next_call() {
    let connector = Arc::new(CountingConnector::new(MockTransport::new(), 1));
    let ctx = context_with(connector.clone());

    let failed = join_all((0..3).map(|_| ctx.connection())).await;
    assert!(failed.iter().all(|r| r.is_err()));
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);

    ctx.connection().await.unwrap();
    assert_eq!(connector.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_metadata_shared_across_calls() {
    let ctx = context(&MockTransport::new());
    let a = ctx.metadata().await.unwrap();
    let b = ctx.metadata().await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.name(), Some("y_psp22_token"));
    assert_eq!(a.messages().len(), 4);
}

#[tokio::test]
async fn test_malformed_metadata() {
    let ctx = AppContext::builder(ClientConfig::default())
        .connector(Arc::new(CountingConnector::new(MockTransport::new(), 0)))
        .metadata_loader(Arc::new(StaticMetadataLoader::new("{\"spec\": 1}")))
        .build();

    let err = ctx
        .query_contract(CONTRACT, "psp22::totalSupply", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Metadata(_)));
}

#[tokio::test]
async fn test_get_accounts() {
    let ctx = context(&MockTransport::new());
    let (wallet, _) = TestWallet::with_signer("wallet-x");
    ctx.register_extension(wallet);
    ctx.register_extension(TestWallet::without_signer("wallet-y"));

    let accounts = ctx.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].source, "wallet-x");
    assert_eq!(accounts[1].source, "wallet-y");
    assert_eq!(accounts[0].address, ALICE);
}

#[tokio::test]
async fn test_sign_payload() {
    let ctx = context(&MockTransport::new());
    let (wallet, signer) = TestWallet::with_signer("wallet-x");
    ctx.register_extension(wallet);

    let signature = ctx
        .sign_payload(r#"{"data": "0x48656c6c6f"}"#, "wallet-x", ALICE)
        .await
        .unwrap();
    assert!(signature.starts_with("0x01"));
    assert_eq!(signer.seen.lock()[0], json!({"data": "0x48656c6c6f", "address": ALICE}));
}

#[tokio::test]
async fn test_sign_malformed_payload_never_reaches_signer() {
    let ctx = context(&MockTransport::new());
    let (wallet, signer) = TestWallet::with_signer("wallet-x");
    ctx.register_extension(wallet);

    let err = ctx
        .sign_payload("{\"data\": ", "wallet-x", ALICE)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidPayload(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(signer.seen.lock().is_empty());
}

#[tokio::test]
async fn test_sign_payload_without_signer() {
    let ctx = context(&MockTransport::new());
    ctx.register_extension(TestWallet::without_signer("wallet-x"));

    let err = ctx
        .sign_payload("{}", "wallet-x", ALICE)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignerUnavailable);
}
