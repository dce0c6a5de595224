//! Transaction submission outcomes and the connection pool.

mod common;

use std::sync::Arc;

use common::Fixture;
use ssid_core::{Hash256, Network};
use ssid_crypto::{Ed25519KeyPair, Signer};
use ssid_sdk::{
    submit_and_watch, ConnectionPool, DispatchError, LedgerCall, SdkError, SsidClient, TxStatus,
};
use ssid_stub::{MemoryConnector, MemoryContentService};

fn some_call() -> LedgerCall {
    LedgerCall::TokensMint {
        vc_id: Hash256([1; 32]),
    }
}

#[tokio::test]
async fn finalized_returns_transaction_hash() {
    let fx = Fixture::new();
    let call = LedgerCall::Sudo(Box::new(LedgerCall::DidRemove {
        did: [0xaa; 32],
        vc: None,
    }));
    // Dispatch fails (no such DID) but the transaction is still finalized
    // with an error, which must surface as a dispatch failure.
    let err = submit_and_watch(fx.ledger.as_ref(), call, &fx.sudo)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "did.DIDDoesNotExist");

    let (did, _) = fx.user("target", 3);
    let call = LedgerCall::Sudo(Box::new(LedgerCall::DidRemove {
        did: did.to_bytes().unwrap(),
        vc: None,
    }));
    let hash = submit_and_watch(fx.ledger.as_ref(), call, &fx.sudo).await.unwrap();
    assert_ne!(hash, Hash256::default());
}

#[tokio::test]
async fn dispatch_error_in_block_rejects_before_finalization() {
    let fx = Fixture::new();
    fx.ledger.script_next_submission(vec![
        TxStatus::Ready,
        TxStatus::InBlock {
            block: Hash256([2; 32]),
            result: Err(DispatchError::module("vc", "NotAnIssuer")),
        },
    ]);
    let err = submit_and_watch(fx.ledger.as_ref(), some_call(), &fx.sudo)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Dispatch(ref code) if code == "vc.NotAnIssuer"));
}

#[tokio::test]
async fn non_module_dispatch_error_passes_through() {
    let fx = Fixture::new();
    fx.ledger.script_next_submission(vec![TxStatus::Finalized {
        block: Hash256([2; 32]),
        result: Err(DispatchError::Other("BadOrigin".into())),
    }]);
    let err = submit_and_watch(fx.ledger.as_ref(), some_call(), &fx.sudo)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BadOrigin");
}

#[tokio::test]
async fn invalid_dropped_and_usurped_are_rejections() {
    let fx = Fixture::new();
    for status in [
        TxStatus::Invalid("Stale".into()),
        TxStatus::Dropped,
        TxStatus::Usurped(Hash256([3; 32])),
    ] {
        fx.ledger.script_next_submission(vec![TxStatus::Ready, status]);
        let err = submit_and_watch(fx.ledger.as_ref(), some_call(), &fx.sudo)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Rejected(_)), "got {err:?}");
    }
}

#[tokio::test]
async fn stream_ending_early_is_subscription_closed() {
    let fx = Fixture::new();
    fx.ledger
        .script_next_submission(vec![TxStatus::Ready, TxStatus::Broadcast]);
    let err = submit_and_watch(fx.ledger.as_ref(), some_call(), &fx.sudo)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::SubscriptionClosed));
}

#[tokio::test]
async fn consecutive_submissions_use_next_nonce() {
    let fx = Fixture::new();
    let (a, _) = fx.user("first", 1);
    let (b, _) = fx.user("second", 2);
    for did in [&a, &b] {
        let call = LedgerCall::Sudo(Box::new(LedgerCall::DidUpdateMetadata {
            did: did.to_bytes().unwrap(),
            metadata: ssid_core::metadata_bytes("updated").unwrap(),
            vc: None,
        }));
        submit_and_watch(fx.ledger.as_ref(), call, &fx.sudo).await.unwrap();
    }
    assert_eq!(fx.ledger.current_block(), 2);
    let details = fx.client.did().did_details(&b).await.unwrap();
    assert_eq!(details.metadata, "updated");
}

#[tokio::test]
async fn pool_shares_one_connection_per_network() {
    let sudo = Ed25519KeyPair::from_seed(&[1; 32]);
    let connector = Arc::new(MemoryConnector::new(sudo.account_id()));
    let pool = Arc::new(ConnectionPool::new(connector.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.get(Network::Local).await.unwrap() })
        })
        .collect();
    let mut ledgers = Vec::new();
    for h in handles {
        ledgers.push(h.await.unwrap());
    }
    assert_eq!(connector.connect_count(), 1);
    assert!(ledgers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));

    pool.get(Network::Testnet).await.unwrap();
    assert_eq!(connector.connect_count(), 2);
    let mut connected = pool.connected().await;
    connected.sort_by_key(|n| n.as_str());
    assert_eq!(connected, vec![Network::Local, Network::Testnet]);
}

#[tokio::test]
async fn fresh_connections_bypass_the_pool() {
    let sudo = Ed25519KeyPair::from_seed(&[1; 32]);
    let connector = Arc::new(MemoryConnector::new(sudo.account_id()));
    let pool = ConnectionPool::new(connector.clone());

    let pooled = pool.get(Network::Dev).await.unwrap();
    let fresh = pool.connect_fresh(Network::Dev).await.unwrap();
    assert!(!Arc::ptr_eq(&pooled, &fresh));
    assert!(Arc::ptr_eq(&pooled, &pool.get(Network::Dev).await.unwrap()));
    assert_eq!(connector.connect_count(), 2);

    assert!(pool.close(Network::Dev).await);
    assert!(!pool.close(Network::Dev).await);
    pool.get(Network::Dev).await.unwrap();
    assert_eq!(connector.connect_count(), 3);

    pool.close_all().await;
    assert!(pool.connected().await.is_empty());
}

#[tokio::test]
async fn client_from_pool() {
    let sudo = Ed25519KeyPair::from_seed(&[1; 32]);
    let pool = ConnectionPool::new(Arc::new(MemoryConnector::new(sudo.account_id())));
    let client = SsidClient::from_pool(&pool, Network::Local, Arc::new(MemoryContentService::new()))
        .await
        .unwrap();
    let ghost = ssid_core::Did::new("did:ssid:ghost");
    assert!(!client.did().is_validator(&ghost).await.unwrap());
}
