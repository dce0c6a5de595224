//! # Ledger Collaborator Boundary
//!
//! The SDK never talks to a node directly. Everything it reads and every
//! transaction it submits goes through [`Ledger`], so the transport (a
//! websocket RPC client, an in-memory ledger in tests) is pluggable.
//!
//! Storage keys mirror the ledger's pallets:
//!
//! | Query | Storage |
//! |-------|---------|
//! | [`Ledger::did_record`] | `did.dIDs` |
//! | [`Ledger::lookup`] / [`Ledger::r_lookup`] | `did.lookup` / `did.rLookup` |
//! | [`Ledger::prev_keys`] | `did.prevKeys` |
//! | [`Ledger::account`] | `did.account` |
//! | [`Ledger::vc`] | `vc.vCs` |
//! | [`Ledger::token_data`] | `tokens.tokenData` |
//!
//! Writes are expressed as [`LedgerCall`] values. A call is SCALE encoded
//! together with the signer's nonce, signed, and handed to
//! [`Ledger::submit`], which streams [`TxStatus`] updates back.

use async_trait::async_trait;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use ssid_core::{AccountId, CurrencyCode, Did, Hash256, VcId, DID_BYTES, METADATA_BYTES};
use ssid_crypto::{blake2_256, Signer};
use ssid_vc::{VcStatus, VerifiableCredential};
use tokio::sync::mpsc;

use crate::error::LedgerError;

/// A registered DID as stored by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidRecord {
    /// The DID itself.
    pub identifier: Did,
    /// The currently bound account.
    pub public_key: AccountId,
    /// Raw metadata bytes.
    pub metadata: [u8; METADATA_BYTES],
    /// Block at which the current key became effective.
    pub added_block: u64,
}

/// Native balance record for a DID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Transactions sent so far.
    pub nonce: u64,
    /// Spendable balance, lowest form.
    pub free: u128,
    /// Held balance, lowest form.
    pub reserved: u128,
}

/// Token metadata registered when a token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Display name.
    pub token_name: String,
    /// Ledger key of the token.
    pub currency_code: CurrencyCode,
    /// Decimal places between lowest and highest form.
    pub decimal: u8,
    /// Block at which the token was issued.
    pub block_number: u64,
}

/// Per-DID balance of one token, in lowest form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenAccount {
    /// Spendable balance.
    pub free: u128,
    /// Balance set aside at issuance, withdrawable by the issuer.
    pub reserved: u128,
    /// Balance that cannot move.
    pub frozen: u128,
}

/// A lock on part of a token balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLock {
    /// Eight-byte lock identifier.
    pub id: [u8; 8],
    /// Locked amount, lowest form.
    pub amount: u128,
}

/// The id the ledger assigns to a credential when it is stored:
/// Blake2b-256 of its SCALE encoding at submission time.
pub fn vc_id_of(vc: &VerifiableCredential) -> VcId {
    blake2_256(&vc.to_scale())
}

/// A credential together with its ledger status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVc {
    /// The credential object.
    pub vc: VerifiableCredential,
    /// Activation status kept beside it.
    pub status: VcStatus,
}

/// A state-changing ledger call.
///
/// DIDs travel as their 32-byte canonical form. Optional `vc` fields carry
/// the SCALE bytes of an authorizing credential; calls without one are
/// expected to be wrapped in [`LedgerCall::Sudo`].
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum LedgerCall {
    #[codec(index = 0)]
    DidAdd {
        public_key: AccountId,
        did: [u8; DID_BYTES],
        metadata: [u8; METADATA_BYTES],
        vc: Option<Vec<u8>>,
    },
    #[codec(index = 1)]
    DidRotateKey {
        did: [u8; DID_BYTES],
        public_key: AccountId,
        vc: Option<Vec<u8>>,
    },
    #[codec(index = 2)]
    DidUpdateMetadata {
        did: [u8; DID_BYTES],
        metadata: [u8; METADATA_BYTES],
        vc: Option<Vec<u8>>,
    },
    #[codec(index = 3)]
    DidRemove {
        did: [u8; DID_BYTES],
        vc: Option<Vec<u8>>,
    },
    #[codec(index = 4)]
    VcStore { vc: Vec<u8> },
    #[codec(index = 5)]
    VcAddSignature { vc_id: VcId, signature: [u8; 64] },
    #[codec(index = 6)]
    VcUpdateStatus { vc_id: VcId, status: VcStatus },
    #[codec(index = 7)]
    TokensIssue { vc_id: VcId, amount: u128 },
    #[codec(index = 8)]
    TokensMint { vc_id: VcId },
    #[codec(index = 9)]
    TokensSlash { vc_id: VcId },
    #[codec(index = 10)]
    TokensTransferWithVc { vc_id: VcId, to: [u8; DID_BYTES] },
    #[codec(index = 11)]
    TokensTransfer {
        to: [u8; DID_BYTES],
        currency_code: [u8; 8],
        amount: u128,
    },
    #[codec(index = 12)]
    TokensTransferAll {
        to: [u8; DID_BYTES],
        currency_code: [u8; 8],
    },
    #[codec(index = 13)]
    TokensWithdrawReserved {
        to: [u8; DID_BYTES],
        from: [u8; DID_BYTES],
        currency_code: [u8; 8],
        amount: u128,
    },
    #[codec(index = 14)]
    BalancesTransfer { to: AccountId, amount: u128 },
    #[codec(index = 15)]
    BalancesTransferWithMemo {
        to: AccountId,
        amount: u128,
        memo: Vec<u8>,
    },
    #[codec(index = 16)]
    SchemaAdd { hash: Hash256, json_data: Vec<u8> },
    #[codec(index = 17)]
    Sudo(Box<LedgerCall>),
}

impl LedgerCall {
    /// `section.method` name of the call, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DidAdd { .. } => "did.add",
            Self::DidRotateKey { .. } => "did.rotateKey",
            Self::DidUpdateMetadata { .. } => "did.updateMetadata",
            Self::DidRemove { .. } => "did.remove",
            Self::VcStore { .. } => "vc.store",
            Self::VcAddSignature { .. } => "vc.addSignature",
            Self::VcUpdateStatus { .. } => "vc.updateStatus",
            Self::TokensIssue { .. } => "tokens.issueToken",
            Self::TokensMint { .. } => "tokens.mintToken",
            Self::TokensSlash { .. } => "tokens.slashToken",
            Self::TokensTransferWithVc { .. } => "tokens.transferToken",
            Self::TokensTransfer { .. } => "tokens.transfer",
            Self::TokensTransferAll { .. } => "tokens.transferAll",
            Self::TokensWithdrawReserved { .. } => "tokens.withdrawReserved",
            Self::BalancesTransfer { .. } => "balances.transfer",
            Self::BalancesTransferWithMemo { .. } => "balances.transferWithMemo",
            Self::SchemaAdd { .. } => "schema.add",
            Self::Sudo(_) => "sudo.sudo",
        }
    }

    /// Wrap in `sudo.sudo` unless an authorizing credential is present.
    pub(crate) fn sudo_unless(self, has_vc: bool) -> Self {
        if has_vc {
            self
        } else {
            Self::Sudo(Box::new(self))
        }
    }
}

/// A signed call ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The call to dispatch.
    pub call: LedgerCall,
    /// Account that signed and pays.
    pub signer: AccountId,
    /// Signer's transaction index.
    pub nonce: u64,
    /// Ed25519 signature over the call and nonce.
    pub signature: [u8; 64],
}

impl SignedTransaction {
    /// The bytes the signer signs: `(call, nonce)` SCALE encoded.
    pub fn signing_payload(call: &LedgerCall, nonce: u64) -> Vec<u8> {
        (call, nonce).encode()
    }

    /// Sign `call` at `nonce`.
    pub fn sign(
        call: LedgerCall,
        nonce: u64,
        signer: &dyn Signer,
    ) -> Result<Self, ssid_crypto::CryptoError> {
        let signature = signer.sign(&Self::signing_payload(&call, nonce))?;
        Ok(Self {
            call,
            signer: signer.account_id(),
            nonce,
            signature: signature.0,
        })
    }

    /// Transaction hash: Blake2b-256 of the full encoding.
    pub fn hash(&self) -> Hash256 {
        blake2_256(&(&self.call, self.signer, self.nonce, self.signature).encode())
    }
}

/// A failed dispatch, as reported in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A pallet error, for example `did.DIDAlreadyExists`.
    Module { section: String, name: String },
    /// Any other failure (bad origin, arithmetic, ...).
    Other(String),
}

impl DispatchError {
    pub fn module(section: &str, name: &str) -> Self {
        Self::Module {
            section: section.to_string(),
            name: name.to_string(),
        }
    }

    /// Normalized `section.name` code.
    pub fn code(&self) -> String {
        match self {
            Self::Module { section, name } => format!("{section}.{name}"),
            Self::Other(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code())
    }
}

/// Lifecycle updates for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Ready,
    Broadcast,
    /// Included in `block`; `result` is the dispatch outcome.
    InBlock {
        block: Hash256,
        result: Result<(), DispatchError>,
    },
    Finalized {
        block: Hash256,
        result: Result<(), DispatchError>,
    },
    Invalid(String),
    Dropped,
    Usurped(Hash256),
}

/// The ledger collaborator.
///
/// Implementations must be `Send + Sync` so a connection can be shared
/// across tasks behind an `Arc`.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Native balance of `did`.
    async fn account(&self, did: &Did) -> Result<AccountInfo, LedgerError>;

    async fn did_record(&self, did: &Did) -> Result<Option<DidRecord>, LedgerError>;

    /// Account currently bound to `did`.
    async fn lookup(&self, did: &Did) -> Result<Option<AccountId>, LedgerError>;

    /// DID bound to `account`; the zero DID when none is.
    async fn r_lookup(&self, account: &AccountId) -> Result<[u8; DID_BYTES], LedgerError>;

    /// Superseded keys of `did` as `(account, added_block)`, oldest first.
    async fn prev_keys(&self, did: &Did) -> Result<Vec<(AccountId, u64)>, LedgerError>;

    async fn validators(&self) -> Result<Vec<Did>, LedgerError>;

    async fn vc(&self, vc_id: &VcId) -> Result<Option<StoredVc>, LedgerError>;

    /// Credentials owned by `did`.
    async fn vc_ids_of(&self, did: &Did) -> Result<Vec<VcId>, LedgerError>;

    /// Owner of `vc_id`.
    async fn vc_owner(&self, vc_id: &VcId) -> Result<Option<Did>, LedgerError>;

    /// Last status change of `vc_id` and the block it happened at.
    async fn vc_history(&self, vc_id: &VcId) -> Result<Option<(VcStatus, u64)>, LedgerError>;

    /// Issuers that have signed `vc_id` so far.
    async fn vc_approvers(&self, vc_id: &VcId) -> Result<Vec<Did>, LedgerError>;

    async fn token_data(
        &self,
        currency_code: &CurrencyCode,
    ) -> Result<Option<TokenDescriptor>, LedgerError>;

    async fn token_account(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<TokenAccount, LedgerError>;

    async fn total_issuance(&self, currency_code: &CurrencyCode) -> Result<u128, LedgerError>;

    async fn locks(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<Vec<BalanceLock>, LedgerError>;

    async fn token_issuer(&self, currency_code: &CurrencyCode) -> Result<Option<Did>, LedgerError>;

    /// Serialized schema stored under `hash`.
    async fn schema(&self, hash: &Hash256) -> Result<Option<String>, LedgerError>;

    /// Next usable nonce for `account`.
    async fn account_next_index(&self, account: &AccountId) -> Result<u64, LedgerError>;

    /// Submit a signed transaction and watch its status.
    ///
    /// Dropping the receiver cancels the subscription.
    async fn submit(&self, tx: SignedTransaction)
        -> Result<mpsc::Receiver<TxStatus>, LedgerError>;
}
