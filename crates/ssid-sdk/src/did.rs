//! # DID Registry Client
//!
//! Creates, resolves and maintains decentralized identifiers on the ledger.
//!
//! Writes that carry no authorizing DID credential are submitted through
//! `sudo.sudo`, so they only succeed when the signer holds the sudo key.
//! A write that carries one (see the `*_vc` builders) is submitted directly
//! by the validator that issued it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ssid_core::{hexutil, metadata_bytes, AccountId, Did, Hash256, METADATA_BYTES};
use ssid_crypto::{Ed25519PublicKey, Signer};
use ssid_vc::{DidAction, DidProperty, DidVc};

use crate::error::{NotFound, SdkError};
use crate::ledger::{DidRecord, Ledger, LedgerCall};
use crate::resolver::resolve_at;
use crate::submit::submit_and_watch;

/// A DID ready for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    /// The identifier being registered.
    pub did: Did,
    /// Account the DID will control.
    pub public_key: AccountId,
    /// NUL-padded metadata.
    #[serde(with = "metadata_hex")]
    pub metadata: [u8; METADATA_BYTES],
}

/// Registered DID as returned by [`DidClient::did_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDetails {
    /// The DID.
    pub identifier: Did,
    /// Currently bound account.
    pub public_key: AccountId,
    /// Metadata as text, padding stripped.
    pub metadata: String,
    /// Block at which the current key became effective.
    pub added_block: u64,
}

/// One superseded signing key: the account and the block it became
/// authoritative at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEpoch {
    /// The superseded account.
    pub account: AccountId,
    /// First block it controlled the DID.
    pub block: u64,
}

/// Build a [`DidDocument`] for `did:ssid:<identifier>`.
///
/// `metadata` is text or `0x` hex of at most 32 bytes.
pub fn generate_did(
    identifier: &str,
    public_key: &Ed25519PublicKey,
    metadata: &str,
) -> Result<DidDocument, SdkError> {
    Ok(DidDocument {
        did: Did::from_identifier(identifier)?,
        public_key: public_key.account_id(),
        metadata: metadata_bytes(metadata)?,
    })
}

/// Credential authorizing registration of `document`, signed by `issuer`.
pub fn add_did_vc(
    document: &DidDocument,
    issuer: &Did,
    signer: &dyn Signer,
) -> Result<DidVc, SdkError> {
    let property = DidProperty {
        metadata: document.metadata,
        prev_public_key: None,
        public_key: document.public_key,
    };
    Ok(DidVc::create(DidAction::Add, property, &document.did, issuer, signer)?)
}

/// DID operations over a ledger connection.
#[derive(Clone)]
pub struct DidClient {
    ledger: Arc<dyn Ledger>,
}

impl DidClient {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Register `document`. Without `vc` the call is wrapped in `sudo`.
    pub async fn store_did(
        &self,
        document: &DidDocument,
        signer: &dyn Signer,
        vc: Option<&DidVc>,
    ) -> Result<Hash256, SdkError> {
        let has_vc = vc.is_some();
        let vc = vc.map(DidVc::to_scale);
        let call = LedgerCall::DidAdd {
            public_key: document.public_key,
            did: document.did.to_bytes()?,
            metadata: document.metadata,
            vc,
        };
        submit_and_watch(self.ledger.as_ref(), call.sudo_unless(has_vc), signer).await
    }

    /// Details of a registered DID, or [`NotFound::Did`].
    pub async fn did_details(&self, did: &Did) -> Result<DidDetails, SdkError> {
        let record = self.require_record(did).await?;
        Ok(DidDetails {
            identifier: record.identifier,
            public_key: record.public_key,
            metadata: hexutil::text_from_fixed(&record.metadata),
            added_block: record.added_block,
        })
    }

    /// Superseded keys of `did`, oldest first. Empty for unknown DIDs.
    pub async fn key_history(&self, did: &Did) -> Result<Vec<KeyEpoch>, SdkError> {
        Ok(self
            .ledger
            .prev_keys(did)
            .await?
            .into_iter()
            .map(|(account, block)| KeyEpoch { account, block })
            .collect())
    }

    /// The account that controlled `did` at `block` (now, if `None`).
    ///
    /// Unknown DIDs resolve to `None` rather than an error.
    pub async fn resolve_account_at(
        &self,
        did: &Did,
        block: Option<u64>,
    ) -> Result<Option<AccountId>, SdkError> {
        let Some(current) = self.ledger.lookup(did).await? else {
            return Ok(None);
        };
        let Some(height) = block else {
            return Ok(Some(current));
        };
        let Some(record) = self.ledger.did_record(did).await? else {
            return Ok(None);
        };
        let history = if height >= record.added_block {
            Vec::new()
        } else {
            self.ledger.prev_keys(did).await?
        };
        Ok(resolve_at(current, record.added_block, &history, block))
    }

    /// The DID bound to `account`, if any.
    pub async fn resolve_account_to_did(
        &self,
        account: &AccountId,
    ) -> Result<Option<Did>, SdkError> {
        let raw = self.ledger.r_lookup(account).await?;
        if raw == [0u8; 32] {
            return Ok(None);
        }
        Ok(Some(Did::from_bytes(raw)))
    }

    /// Bind `did` to `new_key`. The old key is kept in the key history.
    pub async fn rotate_key(
        &self,
        did: &Did,
        new_key: &Ed25519PublicKey,
        signer: &dyn Signer,
        vc: Option<&DidVc>,
    ) -> Result<Hash256, SdkError> {
        let has_vc = vc.is_some();
        let vc = vc.map(DidVc::to_scale);
        let call = LedgerCall::DidRotateKey {
            did: did.to_bytes()?,
            public_key: new_key.account_id(),
            vc,
        };
        submit_and_watch(self.ledger.as_ref(), call.sudo_unless(has_vc), signer).await
    }

    /// Replace the metadata of `did`.
    pub async fn update_metadata(
        &self,
        did: &Did,
        metadata: &str,
        signer: &dyn Signer,
        vc: Option<&DidVc>,
    ) -> Result<Hash256, SdkError> {
        let has_vc = vc.is_some();
        let vc = vc.map(DidVc::to_scale);
        let call = LedgerCall::DidUpdateMetadata {
            did: did.to_bytes()?,
            metadata: metadata_bytes(metadata)?,
            vc,
        };
        submit_and_watch(self.ledger.as_ref(), call.sudo_unless(has_vc), signer).await
    }

    /// Delete `did` and release its account.
    pub async fn remove_did(
        &self,
        did: &Did,
        signer: &dyn Signer,
        vc: Option<&DidVc>,
    ) -> Result<Hash256, SdkError> {
        let has_vc = vc.is_some();
        let vc = vc.map(DidVc::to_scale);
        let call = LedgerCall::DidRemove {
            did: did.to_bytes()?,
            vc,
        };
        submit_and_watch(self.ledger.as_ref(), call.sudo_unless(has_vc), signer).await
    }

    /// Credential authorizing rotation of `did` to `new_key`.
    ///
    /// The previous key and metadata are read from the ledger.
    pub async fn rotate_key_vc(
        &self,
        did: &Did,
        new_key: &Ed25519PublicKey,
        issuer: &Did,
        signer: &dyn Signer,
    ) -> Result<DidVc, SdkError> {
        let record = self.require_record(did).await?;
        let property =
            DidProperty::rotation(record.metadata, record.public_key, new_key.account_id());
        Ok(DidVc::create(DidAction::Rotate, property, did, issuer, signer)?)
    }

    /// Credential authorizing a metadata update of `did`.
    pub async fn update_metadata_vc(
        &self,
        did: &Did,
        metadata: &str,
        issuer: &Did,
        signer: &dyn Signer,
    ) -> Result<DidVc, SdkError> {
        let record = self.require_record(did).await?;
        let property = DidProperty::new(metadata, record.public_key)?;
        Ok(DidVc::create(DidAction::Update, property, did, issuer, signer)?)
    }

    /// Credential authorizing removal of `did`.
    pub async fn remove_did_vc(
        &self,
        did: &Did,
        issuer: &Did,
        signer: &dyn Signer,
    ) -> Result<DidVc, SdkError> {
        let record = self.require_record(did).await?;
        let property = DidProperty {
            metadata: record.metadata,
            prev_public_key: None,
            public_key: record.public_key,
        };
        Ok(DidVc::create(DidAction::Remove, property, did, issuer, signer)?)
    }

    async fn require_record(&self, did: &Did) -> Result<DidRecord, SdkError> {
        Ok(self
            .ledger
            .did_record(did)
            .await?
            .ok_or_else(|| NotFound::Did(did.to_string()))?)
    }

    /// Whether `did` is in the validator set.
    pub async fn is_validator(&self, did: &Did) -> Result<bool, SdkError> {
        Ok(self.ledger.validators().await?.contains(did))
    }

    /// The native account of `did`, required to exist.
    pub(crate) async fn require_account(&self, did: &Did) -> Result<AccountId, SdkError> {
        self.ledger
            .lookup(did)
            .await?
            .filter(|a| !a.is_zero())
            .ok_or_else(|| SdkError::Dispatch(crate::error::RECIPIENT_NOT_REGISTERED.into()))
    }
}

mod metadata_hex {
    use serde::{Deserialize, Deserializer, Serializer};
    use ssid_core::{hexutil, METADATA_BYTES};

    pub fn serialize<S: Serializer>(v: &[u8; METADATA_BYTES], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hexutil::to_prefixed_hex(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; METADATA_BYTES], D::Error> {
        let raw = String::deserialize(d)?;
        hexutil::decode_fixed::<METADATA_BYTES>("metadata", &raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssid_crypto::Ed25519KeyPair;

    #[test]
    fn generate_did_validates_and_pads() {
        let kp = Ed25519KeyPair::from_seed(&[1; 32]);
        let doc = generate_did("alice", &kp.public_key(), "student").unwrap();
        assert_eq!(doc.did, Did::new("did:ssid:alice"));
        assert_eq!(doc.public_key, kp.public_key().account_id());
        assert_eq!(&doc.metadata[..7], b"student");
        assert!(doc.metadata[7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn generate_did_rejects_bad_identifier() {
        let kp = Ed25519KeyPair::from_seed(&[1; 32]);
        assert!(matches!(
            generate_did("a!", &kp.public_key(), ""),
            Err(SdkError::Validation(_))
        ));
        assert!(matches!(
            generate_did("alice", &kp.public_key(), &"m".repeat(33)),
            Err(SdkError::Validation(_))
        ));
    }

    #[test]
    fn document_json_round_trip() {
        let kp = Ed25519KeyPair::from_seed(&[2; 32]);
        let doc = generate_did("bob42", &kp.public_key(), "x").unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: DidDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
