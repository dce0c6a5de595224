//! # In-Memory Ledger
//!
//! A single-node ledger held in process memory. It implements the SDK's
//! [`Ledger`] boundary and enforces the rules the real chain enforces, so
//! SDK workflows can run end to end without a node:
//!
//! - transaction signatures and nonces;
//! - `sudo` for DID writes without an authorizing credential, and issuer,
//!   action and signature checks on those that carry one;
//! - issuer membership and signature checks on credential storage and
//!   approval, with activation once every issuer has signed;
//! - one-shot consumption of active token credentials.
//!
//! Every included transaction produces one block. A failed dispatch still
//! consumes the nonce and the block, but leaves the state untouched.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use ssid_core::{AccountId, CurrencyCode, Did, Hash256, VcId, DID_BYTES};
use ssid_crypto::{blake2_256, sha256, verify, Ed25519PublicKey, Ed25519Signature};
use ssid_sdk::{
    vc_id_of, AccountInfo, BalanceLock, DidRecord, DispatchError, Ledger, LedgerCall,
    LedgerConnector, LedgerError, SignedTransaction, StoredVc, TokenAccount, TokenDescriptor,
    TxStatus,
};
use ssid_vc::{
    AmountVcProperty, DidAction, DidProperty, DidVc, VcProperty, VcStatus, VcType,
    VerifiableCredential,
};
use tokio::sync::mpsc;

type DidKey = [u8; DID_BYTES];
type CodeKey = [u8; 8];

/// Lock id for the reservable balance set aside at token issuance.
pub const RESERVED_LOCK: [u8; 8] = *b"reserved";

#[derive(Clone, Default)]
struct State {
    block: u64,
    sudo: AccountId,
    dids: HashMap<DidKey, DidRecord>,
    r_lookup: HashMap<AccountId, DidKey>,
    prev_keys: HashMap<DidKey, Vec<(AccountId, u64)>>,
    accounts: HashMap<DidKey, AccountInfo>,
    validators: Vec<DidKey>,
    vcs: HashMap<VcId, StoredVc>,
    vc_lookup: HashMap<DidKey, Vec<VcId>>,
    vc_history: HashMap<VcId, (VcStatus, u64)>,
    vc_approvers: HashMap<VcId, Vec<DidKey>>,
    tokens: HashMap<CodeKey, TokenDescriptor>,
    token_issuer: HashMap<CodeKey, DidKey>,
    token_accounts: HashMap<(DidKey, CodeKey), TokenAccount>,
    total_issuance: HashMap<CodeKey, u128>,
    locks: HashMap<(DidKey, CodeKey), Vec<BalanceLock>>,
    schemas: HashMap<Hash256, String>,
    nonces: HashMap<AccountId, u64>,
}

/// The in-memory ledger.
pub struct MemoryLedger {
    state: Mutex<State>,
    scripted: Mutex<VecDeque<Vec<TxStatus>>>,
}

impl MemoryLedger {
    /// An empty ledger whose sudo key is `sudo`.
    pub fn new(sudo: AccountId) -> Self {
        Self {
            state: Mutex::new(State {
                sudo,
                ..State::default()
            }),
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Height of the latest block.
    pub fn current_block(&self) -> u64 {
        self.state.lock().block
    }

    /// Produce `n` empty blocks.
    pub fn advance_blocks(&self, n: u64) {
        self.state.lock().block += n;
    }

    /// Register `did` for `account` directly, as genesis configuration would.
    pub fn register_did(&self, did: &Did, account: AccountId) -> Result<(), DispatchError> {
        let did = did
            .to_bytes()
            .map_err(|e| DispatchError::Other(e.to_string()))?;
        let mut state = self.state.lock();
        let sudo = state.sudo;
        let call = LedgerCall::DidAdd {
            public_key: account,
            did,
            metadata: [0u8; 32],
            vc: None,
        };
        dispatch(&mut state, sudo, true, call)
    }

    pub fn add_validator(&self, did: &Did) {
        if let Ok(key) = did.to_bytes() {
            let mut state = self.state.lock();
            if !state.validators.contains(&key) {
                state.validators.push(key);
            }
        }
    }

    /// Set the free native balance of `did` (lowest form).
    pub fn set_balance(&self, did: &Did, free: u128) {
        if let Ok(key) = did.to_bytes() {
            self.state.lock().accounts.entry(key).or_default().free = free;
        }
    }

    /// Replace the outcome of the next submission with `statuses`.
    ///
    /// The scripted transaction is not applied.
    pub fn script_next_submission(&self, statuses: Vec<TxStatus>) {
        self.scripted.lock().push_back(statuses);
    }

    fn include(&self, tx: SignedTransaction) -> Vec<TxStatus> {
        let payload = SignedTransaction::signing_payload(&tx.call, tx.nonce);
        let signature = Ed25519Signature::from_bytes(tx.signature);
        if verify(&payload, &signature, &Ed25519PublicKey::from(tx.signer)).is_err() {
            return vec![TxStatus::Invalid("BadProof".into())];
        }

        let mut state = self.state.lock();
        let expected = state.nonces.get(&tx.signer).copied().unwrap_or(0);
        if tx.nonce != expected {
            let reason = if tx.nonce < expected { "Stale" } else { "Future" };
            return vec![TxStatus::Invalid(reason.into())];
        }
        state.block += 1;
        state.nonces.insert(tx.signer, expected + 1);

        let name = tx.call.name();
        let mut next = state.clone();
        let result = dispatch(&mut next, tx.signer, false, tx.call);
        if result.is_ok() {
            *state = next;
        }
        let block = block_hash(state.block);
        match &result {
            Ok(()) => tracing::debug!(call = name, height = state.block, "dispatched"),
            Err(e) => tracing::debug!(call = name, height = state.block, error = %e, "dispatch failed"),
        }
        vec![
            TxStatus::Ready,
            TxStatus::InBlock {
                block,
                result: result.clone(),
            },
            TxStatus::Finalized { block, result },
        ]
    }
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("block", &self.current_block())
            .finish_non_exhaustive()
    }
}

fn block_hash(height: u64) -> Hash256 {
    blake2_256(&height.to_le_bytes())
}

fn fail(section: &str, name: &str) -> DispatchError {
    DispatchError::module(section, name)
}

fn bad_origin() -> DispatchError {
    DispatchError::Other("BadOrigin".into())
}

fn overflow() -> DispatchError {
    DispatchError::Other("Arithmetic: Overflow".into())
}

fn origin_did(state: &State, origin: &AccountId) -> Result<DidKey, DispatchError> {
    state
        .r_lookup
        .get(origin)
        .copied()
        .ok_or_else(|| fail("did", "DIDDoesNotExist"))
}

/// DID writes need root, or a credential for exactly this write signed by
/// a validator and submitted from that validator's current key.
///
/// `expected` is the property the write would produce; `None` when the
/// target DID is missing.
fn authorize_did_write(
    state: &State,
    origin: &AccountId,
    root: bool,
    vc: Option<&[u8]>,
    action: DidAction,
    did: &DidKey,
    expected: Option<&DidProperty>,
) -> Result<(), DispatchError> {
    if root {
        return Ok(());
    }
    let Some(bytes) = vc else {
        return Err(bad_origin());
    };
    let submitter = state.r_lookup.get(origin).ok_or_else(bad_origin)?;
    if !state.validators.contains(submitter) {
        return Err(bad_origin());
    }
    let vc = DidVc::from_scale(bytes).map_err(|_| fail("did", "InvalidVC"))?;
    if vc.issuer != *submitter
        || vc.vc_type != action
        || vc.owner != *did
        || expected != Some(&vc.property)
    {
        return Err(fail("did", "InvalidVC"));
    }
    vc.verify(&Ed25519PublicKey::from(*origin))
        .map_err(|_| fail("did", "InvalidVC"))
}

fn dispatch(
    state: &mut State,
    origin: AccountId,
    root: bool,
    call: LedgerCall,
) -> Result<(), DispatchError> {
    let block = state.block;
    match call {
        LedgerCall::Sudo(inner) => {
            if origin != state.sudo {
                return Err(fail("sudo", "RequireSudo"));
            }
            dispatch(state, origin, true, *inner)
        }

        LedgerCall::DidAdd {
            public_key,
            did,
            metadata,
            vc,
        } => {
            let expected = DidProperty {
                metadata,
                prev_public_key: None,
                public_key,
            };
            authorize_did_write(
                state,
                &origin,
                root,
                vc.as_deref(),
                DidAction::Add,
                &did,
                Some(&expected),
            )?;
            if state.dids.contains_key(&did) {
                return Err(fail("did", "DIDAlreadyExists"));
            }
            if state.r_lookup.contains_key(&public_key) {
                return Err(fail("did", "PublicKeyRegistered"));
            }
            state.dids.insert(
                did,
                DidRecord {
                    identifier: Did::from_bytes(did),
                    public_key,
                    metadata,
                    added_block: block,
                },
            );
            state.r_lookup.insert(public_key, did);
            state.accounts.entry(did).or_default();
            Ok(())
        }

        LedgerCall::DidRotateKey {
            did,
            public_key,
            vc,
        } => {
            let expected = state
                .dids
                .get(&did)
                .map(|r| DidProperty::rotation(r.metadata, r.public_key, public_key));
            authorize_did_write(
                state,
                &origin,
                root,
                vc.as_deref(),
                DidAction::Rotate,
                &did,
                expected.as_ref(),
            )?;
            if state.r_lookup.contains_key(&public_key) {
                return Err(fail("did", "PublicKeyRegistered"));
            }
            let record = state
                .dids
                .get_mut(&did)
                .ok_or_else(|| fail("did", "DIDDoesNotExist"))?;
            let previous = (record.public_key, record.added_block);
            record.public_key = public_key;
            record.added_block = block;
            state.r_lookup.remove(&previous.0);
            state.r_lookup.insert(public_key, did);
            state.prev_keys.entry(did).or_default().push(previous);
            Ok(())
        }

        LedgerCall::DidUpdateMetadata { did, metadata, vc } => {
            let expected = state.dids.get(&did).map(|r| DidProperty {
                metadata,
                prev_public_key: None,
                public_key: r.public_key,
            });
            authorize_did_write(
                state,
                &origin,
                root,
                vc.as_deref(),
                DidAction::Update,
                &did,
                expected.as_ref(),
            )?;
            let record = state
                .dids
                .get_mut(&did)
                .ok_or_else(|| fail("did", "DIDDoesNotExist"))?;
            record.metadata = metadata;
            Ok(())
        }

        LedgerCall::DidRemove { did, vc } => {
            let expected = state.dids.get(&did).map(|r| DidProperty {
                metadata: r.metadata,
                prev_public_key: None,
                public_key: r.public_key,
            });
            authorize_did_write(
                state,
                &origin,
                root,
                vc.as_deref(),
                DidAction::Remove,
                &did,
                expected.as_ref(),
            )?;
            let record = state
                .dids
                .remove(&did)
                .ok_or_else(|| fail("did", "DIDDoesNotExist"))?;
            state.r_lookup.remove(&record.public_key);
            Ok(())
        }

        LedgerCall::VcStore { vc } => {
            let vc =
                VerifiableCredential::from_scale(&vc).map_err(|_| fail("vc", "InvalidVC"))?;
            let submitter = origin_did(state, &origin)?;
            if !vc.issuers.contains(&submitter) {
                return Err(fail("vc", "NotAnIssuer"));
            }
            if vc.is_vc_used {
                return Err(fail("vc", "InvalidVC"));
            }
            if vc.vc_type.has_local_hash() {
                let hash = vc.local_hash().map_err(|_| fail("vc", "InvalidVC"))?;
                if hash != vc.hash {
                    return Err(fail("vc", "InvalidVC"));
                }
            }
            if vc.signatures.len() != 1 || !vc.signed_by(&Ed25519PublicKey::from(origin)) {
                return Err(fail("vc", "InvalidSignature"));
            }
            let vc_id = vc_id_of(&vc);
            if state.vcs.contains_key(&vc_id) {
                return Err(fail("vc", "VCAlreadyExists"));
            }
            let status = if vc.signatures.len() >= vc.issuers.len() {
                VcStatus::Active
            } else {
                VcStatus::Inactive
            };
            state.vc_lookup.entry(vc.owner).or_default().push(vc_id);
            state.vc_history.insert(vc_id, (status, block));
            state.vc_approvers.insert(vc_id, vec![submitter]);
            state.vcs.insert(vc_id, StoredVc { vc, status });
            Ok(())
        }

        LedgerCall::VcAddSignature { vc_id, signature } => {
            let signer = origin_did(state, &origin)?;
            let stored = state
                .vcs
                .get_mut(&vc_id)
                .ok_or_else(|| fail("vc", "VCNotFound"))?;
            if !stored.vc.issuers.contains(&signer) {
                return Err(fail("vc", "NotAnIssuer"));
            }
            let sig = Ed25519Signature::from_bytes(signature);
            if verify(stored.vc.hash.as_bytes(), &sig, &Ed25519PublicKey::from(origin)).is_err() {
                return Err(fail("vc", "InvalidSignature"));
            }
            let approvers = state.vc_approvers.entry(vc_id).or_default();
            if stored.vc.has_signature(&sig) || approvers.contains(&signer) {
                return Err(fail("vc", "DuplicateSignature"));
            }
            stored.vc.signatures.push(signature);
            approvers.push(signer);
            if stored.status == VcStatus::Inactive
                && stored.vc.signatures.len() >= stored.vc.issuers.len()
            {
                stored.status = VcStatus::Active;
                state.vc_history.insert(vc_id, (VcStatus::Active, block));
            }
            Ok(())
        }

        LedgerCall::VcUpdateStatus { vc_id, status } => {
            let actor = if root {
                None
            } else {
                Some(origin_did(state, &origin)?)
            };
            let stored = state
                .vcs
                .get_mut(&vc_id)
                .ok_or_else(|| fail("vc", "VCNotFound"))?;
            if let Some(actor) = actor {
                if !stored.vc.issuers.contains(&actor) && !state.validators.contains(&actor) {
                    return Err(fail("vc", "NotAnIssuer"));
                }
            }
            stored.status = status;
            state.vc_history.insert(vc_id, (status, block));
            Ok(())
        }

        LedgerCall::TokensIssue { vc_id, amount } => {
            let vc = consume(state, &origin, &vc_id, VcType::TokenVc)?;
            let VcProperty::Token(p) = vc.property().map_err(|_| fail("vc", "InvalidVC"))? else {
                return Err(fail("vc", "InvalidVC"));
            };
            let code = p.currency_code.to_bytes();
            if state.tokens.contains_key(&code) {
                return Err(fail("tokens", "CurrencyCodeAlreadyRegistered"));
            }
            let total = amount
                .checked_add(p.reservable_balance)
                .ok_or_else(overflow)?;
            state.tokens.insert(
                code,
                TokenDescriptor {
                    token_name: p.token_name.as_str().to_string(),
                    currency_code: p.currency_code.clone(),
                    decimal: p.decimal,
                    block_number: block,
                },
            );
            state.token_issuer.insert(code, vc.owner);
            let account = state.token_accounts.entry((vc.owner, code)).or_default();
            account.free = amount;
            account.reserved = p.reservable_balance;
            if p.reservable_balance > 0 {
                state.locks.insert(
                    (vc.owner, code),
                    vec![BalanceLock {
                        id: RESERVED_LOCK,
                        amount: p.reservable_balance,
                    }],
                );
            }
            state.total_issuance.insert(code, total);
            Ok(())
        }

        LedgerCall::TokensMint { vc_id } => {
            let vc = consume(state, &origin, &vc_id, VcType::MintTokens)?;
            let p = amount_property(&vc)?;
            let code = require_issuer(state, &p.currency_code, &vc.owner)?;
            credit(state, vc.owner, code, p.amount)?;
            adjust_issuance(state, code, p.amount, true)
        }

        LedgerCall::TokensSlash { vc_id } => {
            let vc = consume(state, &origin, &vc_id, VcType::SlashTokens)?;
            let p = amount_property(&vc)?;
            let code = require_issuer(state, &p.currency_code, &vc.owner)?;
            debit(state, vc.owner, code, p.amount)?;
            adjust_issuance(state, code, p.amount, false)
        }

        LedgerCall::TokensTransferWithVc { vc_id, to } => {
            let vc = consume(state, &origin, &vc_id, VcType::TokenTransferVc)?;
            let p = amount_property(&vc)?;
            let code = require_token(state, &p.currency_code.to_bytes())?;
            require_registered(state, &to)?;
            debit(state, vc.owner, code, p.amount)?;
            credit(state, to, code, p.amount)
        }

        LedgerCall::TokensTransfer {
            to,
            currency_code,
            amount,
        } => {
            let from = origin_did(state, &origin)?;
            let code = require_token(state, &currency_code)?;
            require_registered(state, &to)?;
            debit(state, from, code, amount)?;
            credit(state, to, code, amount)
        }

        LedgerCall::TokensTransferAll { to, currency_code } => {
            let from = origin_did(state, &origin)?;
            let code = require_token(state, &currency_code)?;
            require_registered(state, &to)?;
            let amount = state
                .token_accounts
                .get(&(from, code))
                .map(|a| a.free)
                .unwrap_or(0);
            debit(state, from, code, amount)?;
            credit(state, to, code, amount)
        }

        LedgerCall::TokensWithdrawReserved {
            to,
            from,
            currency_code,
            amount,
        } => {
            let actor = origin_did(state, &origin)?;
            let code = require_token(state, &currency_code)?;
            if state.token_issuer.get(&code) != Some(&actor) {
                return Err(fail("tokens", "NotTokenIssuer"));
            }
            require_registered(state, &to)?;
            let source = state.token_accounts.entry((from, code)).or_default();
            source.reserved = source
                .reserved
                .checked_sub(amount)
                .ok_or_else(|| fail("tokens", "BalanceTooLow"))?;
            if let Some(locks) = state.locks.get_mut(&(from, code)) {
                for lock in locks.iter_mut().filter(|l| l.id == RESERVED_LOCK) {
                    lock.amount = lock.amount.saturating_sub(amount);
                }
                locks.retain(|l| l.amount > 0);
            }
            credit(state, to, code, amount)
        }

        LedgerCall::BalancesTransfer { to, amount }
        | LedgerCall::BalancesTransferWithMemo { to, amount, .. } => {
            let from = origin_did(state, &origin)?;
            let to = state
                .r_lookup
                .get(&to)
                .copied()
                .ok_or_else(|| fail("balances", "RecipentDIDNotRegistered"))?;
            let source = state.accounts.entry(from).or_default();
            source.free = source
                .free
                .checked_sub(amount)
                .ok_or_else(|| fail("balances", "InsufficientBalance"))?;
            let target = state.accounts.entry(to).or_default();
            target.free = target.free.checked_add(amount).ok_or_else(overflow)?;
            Ok(())
        }

        LedgerCall::SchemaAdd { hash, json_data } => {
            let json = String::from_utf8(json_data).map_err(|_| fail("schema", "InvalidSchema"))?;
            if sha256(json.as_bytes()) != hash {
                return Err(fail("schema", "HashMismatch"));
            }
            if state.schemas.contains_key(&hash) {
                return Err(fail("schema", "SchemaAlreadyExists"));
            }
            state.schemas.insert(hash, json);
            Ok(())
        }
    }
}

/// Check that `vc_id` is an active, unused credential of `expected` type
/// owned by the origin, and mark it used.
fn consume(
    state: &mut State,
    origin: &AccountId,
    vc_id: &VcId,
    expected: VcType,
) -> Result<VerifiableCredential, DispatchError> {
    let owner = origin_did(state, origin)?;
    let stored = state
        .vcs
        .get_mut(vc_id)
        .ok_or_else(|| fail("vc", "VCNotFound"))?;
    if stored.vc.vc_type != expected {
        return Err(fail("tokens", "InvalidVCType"));
    }
    if stored.vc.owner != owner {
        return Err(fail("vc", "NotVCOwner"));
    }
    if stored.status != VcStatus::Active {
        return Err(fail("vc", "VCNotActive"));
    }
    if stored.vc.is_vc_used {
        return Err(fail("vc", "VCAlreadyUsed"));
    }
    stored.vc.is_vc_used = true;
    Ok(stored.vc.clone())
}

fn amount_property(vc: &VerifiableCredential) -> Result<AmountVcProperty, DispatchError> {
    match vc.property().map_err(|_| fail("vc", "InvalidVC"))? {
        VcProperty::Mint(p) | VcProperty::Slash(p) | VcProperty::Transfer(p) => Ok(p),
        _ => Err(fail("vc", "InvalidVC")),
    }
}

fn require_token(state: &State, code: &CodeKey) -> Result<CodeKey, DispatchError> {
    if state.tokens.contains_key(code) {
        Ok(*code)
    } else {
        Err(fail("tokens", "CurrencyCodeNotRegistered"))
    }
}

fn require_issuer(
    state: &State,
    currency_code: &CurrencyCode,
    did: &DidKey,
) -> Result<CodeKey, DispatchError> {
    let code = require_token(state, &currency_code.to_bytes())?;
    if state.token_issuer.get(&code) != Some(did) {
        return Err(fail("tokens", "NotTokenIssuer"));
    }
    Ok(code)
}

fn require_registered(state: &State, did: &DidKey) -> Result<(), DispatchError> {
    if state.dids.contains_key(did) {
        Ok(())
    } else {
        Err(fail("balances", "RecipentDIDNotRegistered"))
    }
}

fn credit(state: &mut State, did: DidKey, code: CodeKey, amount: u128) -> Result<(), DispatchError> {
    let account = state.token_accounts.entry((did, code)).or_default();
    account.free = account.free.checked_add(amount).ok_or_else(overflow)?;
    Ok(())
}

fn debit(state: &mut State, did: DidKey, code: CodeKey, amount: u128) -> Result<(), DispatchError> {
    let account = state.token_accounts.entry((did, code)).or_default();
    account.free = account
        .free
        .checked_sub(amount)
        .ok_or_else(|| fail("tokens", "BalanceTooLow"))?;
    Ok(())
}

fn adjust_issuance(
    state: &mut State,
    code: CodeKey,
    amount: u128,
    increase: bool,
) -> Result<(), DispatchError> {
    let total = state.total_issuance.entry(code).or_default();
    *total = if increase {
        total.checked_add(amount).ok_or_else(overflow)?
    } else {
        total
            .checked_sub(amount)
            .ok_or_else(|| fail("tokens", "BalanceTooLow"))?
    };
    Ok(())
}

fn key(did: &Did) -> Option<DidKey> {
    did.to_bytes().ok()
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn account(&self, did: &Did) -> Result<AccountInfo, LedgerError> {
        let state = self.state.lock();
        let Some(did) = key(did) else {
            return Ok(AccountInfo::default());
        };
        let mut info = state.accounts.get(&did).copied().unwrap_or_default();
        if let Some(record) = state.dids.get(&did) {
            info.nonce = state.nonces.get(&record.public_key).copied().unwrap_or(0);
        }
        Ok(info)
    }

    async fn did_record(&self, did: &Did) -> Result<Option<DidRecord>, LedgerError> {
        Ok(key(did).and_then(|k| self.state.lock().dids.get(&k).cloned()))
    }

    async fn lookup(&self, did: &Did) -> Result<Option<AccountId>, LedgerError> {
        Ok(key(did).and_then(|k| self.state.lock().dids.get(&k).map(|r| r.public_key)))
    }

    async fn r_lookup(&self, account: &AccountId) -> Result<[u8; DID_BYTES], LedgerError> {
        Ok(self
            .state
            .lock()
            .r_lookup
            .get(account)
            .copied()
            .unwrap_or([0u8; DID_BYTES]))
    }

    async fn prev_keys(&self, did: &Did) -> Result<Vec<(AccountId, u64)>, LedgerError> {
        Ok(key(did)
            .and_then(|k| self.state.lock().prev_keys.get(&k).cloned())
            .unwrap_or_default())
    }

    async fn validators(&self) -> Result<Vec<Did>, LedgerError> {
        Ok(self
            .state
            .lock()
            .validators
            .iter()
            .map(|k| Did::from_bytes(*k))
            .collect())
    }

    async fn vc(&self, vc_id: &VcId) -> Result<Option<StoredVc>, LedgerError> {
        Ok(self.state.lock().vcs.get(vc_id).cloned())
    }

    async fn vc_ids_of(&self, did: &Did) -> Result<Vec<VcId>, LedgerError> {
        Ok(key(did)
            .and_then(|k| self.state.lock().vc_lookup.get(&k).cloned())
            .unwrap_or_default())
    }

    async fn vc_owner(&self, vc_id: &VcId) -> Result<Option<Did>, LedgerError> {
        Ok(self
            .state
            .lock()
            .vcs
            .get(vc_id)
            .map(|s| Did::from_bytes(s.vc.owner)))
    }

    async fn vc_history(&self, vc_id: &VcId) -> Result<Option<(VcStatus, u64)>, LedgerError> {
        Ok(self.state.lock().vc_history.get(vc_id).copied())
    }

    async fn vc_approvers(&self, vc_id: &VcId) -> Result<Vec<Did>, LedgerError> {
        Ok(self
            .state
            .lock()
            .vc_approvers
            .get(vc_id)
            .map(|v| v.iter().map(|k| Did::from_bytes(*k)).collect())
            .unwrap_or_default())
    }

    async fn token_data(
        &self,
        currency_code: &CurrencyCode,
    ) -> Result<Option<TokenDescriptor>, LedgerError> {
        Ok(self
            .state
            .lock()
            .tokens
            .get(&currency_code.to_bytes())
            .cloned())
    }

    async fn token_account(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<TokenAccount, LedgerError> {
        Ok(key(did)
            .and_then(|k| {
                self.state
                    .lock()
                    .token_accounts
                    .get(&(k, currency_code.to_bytes()))
                    .copied()
            })
            .unwrap_or_default())
    }

    async fn total_issuance(&self, currency_code: &CurrencyCode) -> Result<u128, LedgerError> {
        Ok(self
            .state
            .lock()
            .total_issuance
            .get(&currency_code.to_bytes())
            .copied()
            .unwrap_or(0))
    }

    async fn locks(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<Vec<BalanceLock>, LedgerError> {
        Ok(key(did)
            .and_then(|k| {
                self.state
                    .lock()
                    .locks
                    .get(&(k, currency_code.to_bytes()))
                    .cloned()
            })
            .unwrap_or_default())
    }

    async fn token_issuer(&self, currency_code: &CurrencyCode) -> Result<Option<Did>, LedgerError> {
        Ok(self
            .state
            .lock()
            .token_issuer
            .get(&currency_code.to_bytes())
            .map(|k| Did::from_bytes(*k)))
    }

    async fn schema(&self, hash: &Hash256) -> Result<Option<String>, LedgerError> {
        Ok(self.state.lock().schemas.get(hash).cloned())
    }

    async fn account_next_index(&self, account: &AccountId) -> Result<u64, LedgerError> {
        Ok(self.state.lock().nonces.get(account).copied().unwrap_or(0))
    }

    async fn submit(
        &self,
        tx: SignedTransaction,
    ) -> Result<mpsc::Receiver<TxStatus>, LedgerError> {
        let script = self.scripted.lock().pop_front();
        let statuses = match script {
            Some(statuses) => statuses,
            None => self.include(tx),
        };
        let (sender, receiver) = mpsc::channel(statuses.len().max(1));
        for status in statuses {
            sender
                .try_send(status)
                .map_err(|e| LedgerError::Transport(e.to_string()))?;
        }
        Ok(receiver)
    }
}

/// Opens a fresh [`MemoryLedger`] per connection and counts connections.
pub struct MemoryConnector {
    sudo: AccountId,
    connects: AtomicUsize,
}

impl MemoryConnector {
    pub fn new(sudo: AccountId) -> Self {
        Self {
            sudo,
            connects: AtomicUsize::new(0),
        }
    }

    /// How many connections were opened.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerConnector for MemoryConnector {
    async fn connect(&self, network: ssid_core::Network) -> Result<Arc<dyn Ledger>, LedgerError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%network, "opening in-memory ledger");
        tokio::task::yield_now().await;
        Ok(Arc::new(MemoryLedger::new(self.sudo)))
    }
}
