//! # ssid-sdk: SSID Client SDK
//!
//! Orchestrates identity, credential and token workflows against two
//! collaborators:
//!
//! - a [`Ledger`] connection, for storage queries and signed submissions;
//! - a [`ContentService`], for the off-chain content behind generic
//!   credentials.
//!
//! ## Architecture
//!
//! ```text
//! SsidClient
//!   ├── DidClient      did.*        (registry, key history, resolution)
//!   ├── VcClient       vc.*         (generate, store, approve, verify)
//!   ├── TokenClient    tokens.*     (issue, mint, slash, transfer)
//!   ├── BalanceClient  balances.*   (native currency)
//!   └── SchemaClient   schema.*
//! ```
//!
//! Every write goes through [`submit_and_watch`], which resolves once the
//! transaction is finalized or rejects with the ledger's `section.name`
//! dispatch code. Connections come from an explicitly owned
//! [`ConnectionPool`]; there is no process-wide connection state.
//!
//! ## Crate Policy
//!
//! - No retries and no timeouts. Wrap calls in `tokio::time::timeout` for
//!   deadlines.
//! - Authority, approval thresholds and one-shot consumption are enforced
//!   by the ledger, not here.

pub mod balance;
pub mod connection;
pub mod did;
pub mod error;
pub mod ledger;
pub mod resolver;
pub mod schema;
pub mod submit;
pub mod token;
pub mod vc;

pub use balance::BalanceClient;
pub use connection::{ConnectionPool, LedgerConnector};
pub use did::{add_did_vc, generate_did, DidClient, DidDetails, DidDocument, KeyEpoch};
pub use error::{LedgerError, NotFound, SdkError, RECIPIENT_NOT_REGISTERED};
pub use ledger::{
    vc_id_of, AccountInfo, BalanceLock, DidRecord, DispatchError, Ledger, LedgerCall,
    SignedTransaction, StoredVc, TokenAccount, TokenDescriptor, TxStatus,
};
pub use resolver::resolve_at;
pub use schema::SchemaClient;
pub use submit::submit_and_watch;
pub use token::{LockView, TokenBalance, TokenClient};
pub use vc::{token_vc_property, VcClient};

use std::sync::Arc;

use ssid_content::ContentService;
use ssid_core::Network;

/// Top-level SDK client.
///
/// Cheap to clone; all sub-clients share the same connection and content
/// service.
#[derive(Clone)]
pub struct SsidClient {
    did: DidClient,
    vc: VcClient,
    tokens: TokenClient,
    balances: BalanceClient,
    schema: SchemaClient,
}

impl SsidClient {
    /// Build a client over explicit collaborators.
    pub fn new(ledger: Arc<dyn Ledger>, content: Arc<dyn ContentService>) -> Self {
        Self {
            did: DidClient::new(Arc::clone(&ledger)),
            vc: VcClient::new(Arc::clone(&ledger), content),
            tokens: TokenClient::new(Arc::clone(&ledger)),
            balances: BalanceClient::new(Arc::clone(&ledger)),
            schema: SchemaClient::new(ledger),
        }
    }

    /// Build a client over the pooled connection for `network`.
    pub async fn from_pool(
        pool: &ConnectionPool,
        network: Network,
        content: Arc<dyn ContentService>,
    ) -> Result<Self, SdkError> {
        Ok(Self::new(pool.get(network).await?, content))
    }

    /// DID registry operations.
    pub fn did(&self) -> &DidClient {
        &self.did
    }

    /// Verifiable credential operations.
    pub fn vc(&self) -> &VcClient {
        &self.vc
    }

    /// Token operations.
    pub fn tokens(&self) -> &TokenClient {
        &self.tokens
    }

    /// Native balance operations.
    pub fn balances(&self) -> &BalanceClient {
        &self.balances
    }

    /// Schema registry operations.
    pub fn schema(&self) -> &SchemaClient {
        &self.schema
    }
}

impl std::fmt::Debug for SsidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsidClient").finish_non_exhaustive()
    }
}
