//! Shared fixture: an SDK client wired to the in-memory ledger and content
//! service.

#![allow(dead_code)]

use std::sync::Arc;

use ssid_core::Did;
use ssid_crypto::{Ed25519KeyPair, Signer};
use ssid_sdk::SsidClient;
use ssid_stub::{MemoryContentService, MemoryLedger};

pub struct Fixture {
    pub ledger: Arc<MemoryLedger>,
    pub content: MemoryContentService,
    pub client: SsidClient,
    pub sudo: Ed25519KeyPair,
}

impl Fixture {
    pub fn new() -> Self {
        let sudo = Ed25519KeyPair::from_seed(&[0xee; 32]);
        let ledger = Arc::new(MemoryLedger::new(sudo.account_id()));
        let content = MemoryContentService::new();
        let client = SsidClient::new(ledger.clone(), Arc::new(content.clone()));
        Self {
            ledger,
            content,
            client,
            sudo,
        }
    }

    /// Register `did:ssid:<name>` with a key derived from `seed`.
    pub fn user(&self, name: &str, seed: u8) -> (Did, Ed25519KeyPair) {
        let did = Did::from_identifier(name).unwrap();
        let kp = Ed25519KeyPair::from_seed(&[seed; 32]);
        self.ledger.register_did(&did, kp.account_id()).unwrap();
        (did, kp)
    }
}
