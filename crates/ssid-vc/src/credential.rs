//! # Ledger Credential
//!
//! `VerifiableCredential` is the object the ledger stores, SCALE-encoded as
//!
//! ```text
//! hash (32) ‖ owner (32) ‖ issuers Vec<[u8; 32]> ‖ signatures Vec<[u8; 64]>
//!   ‖ is_vc_used (bool) ‖ vc_type (u8) ‖ vc_property (128)
//! ```
//!
//! Its [`VcStatus`] is kept by the ledger beside the object, not inside it.
//! Nothing here mutates ledger state; a new signature or status is a new
//! submission.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use ssid_core::{Did, Hash256, DID_BYTES, VC_PROPERTY_BYTES};
use ssid_crypto::{Ed25519PublicKey, Ed25519Signature};

use crate::error::VcError;
use crate::payload::{hash_payload, signing_payload};
use crate::property::VcProperty;
use crate::vc_type::VcType;

/// Ledger-side activation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum VcStatus {
    /// Fully approved, or re-activated by a privileged override.
    #[codec(index = 0)]
    Active,
    /// Awaiting signatures, or revoked.
    #[codec(index = 1)]
    Inactive,
}

/// A credential as stored on the ledger.
#[derive(Clone, PartialEq, Eq, Encode, Decode)]
pub struct VerifiableCredential {
    /// Hash of record; also the credential's ledger id.
    pub hash: Hash256,
    /// DID the credential is about.
    pub owner: [u8; DID_BYTES],
    /// DIDs whose signatures activate the credential.
    pub issuers: Vec<[u8; DID_BYTES]>,
    /// Signatures collected so far, each over the 32 hash bytes.
    pub signatures: Vec<[u8; 64]>,
    /// Set by the ledger when a consuming operation uses the credential.
    pub is_vc_used: bool,
    /// Type tag.
    pub vc_type: VcType,
    /// Fixed-layout property blob.
    pub vc_property: [u8; VC_PROPERTY_BYTES],
}

impl VerifiableCredential {
    /// Decode from SCALE bytes.
    pub fn from_scale(bytes: &[u8]) -> Result<Self, VcError> {
        Self::decode(&mut &bytes[..]).map_err(|e| VcError::decode("verifiable credential", e))
    }

    /// Encode to SCALE bytes, as submitted by `vc.store`.
    pub fn to_scale(&self) -> Vec<u8> {
        self.encode()
    }

    /// The owner as a [`Did`].
    pub fn owner_did(&self) -> Did {
        Did::from_bytes(self.owner)
    }

    /// The issuers as [`Did`]s.
    pub fn issuer_dids(&self) -> Vec<Did> {
        self.issuers.iter().copied().map(Did::from_bytes).collect()
    }

    /// Decode the property blob by this credential's type.
    pub fn property(&self) -> Result<VcProperty, VcError> {
        VcProperty::decode(self.vc_type, &self.vc_property)
    }

    /// The signing payload of this credential.
    pub fn signing_payload(&self) -> Vec<u8> {
        signing_payload(self.vc_type, &self.vc_property, &self.owner, &self.issuers)
    }

    /// Recompute the hash of record locally.
    ///
    /// Fails with [`VcError::HashNotLocal`] for generic credentials, whose
    /// hash is supplied by the content service.
    pub fn local_hash(&self) -> Result<Hash256, VcError> {
        if !self.vc_type.has_local_hash() {
            return Err(VcError::HashNotLocal(self.vc_type));
        }
        Ok(hash_payload(&self.signing_payload()))
    }

    /// Whether `signature` is already attached.
    pub fn has_signature(&self, signature: &Ed25519Signature) -> bool {
        self.signatures.iter().any(|s| s == signature.as_bytes())
    }

    /// Whether any attached signature verifies under `public_key`.
    pub fn signed_by(&self, public_key: &Ed25519PublicKey) -> bool {
        self.signatures.iter().any(|s| {
            ssid_crypto::verify(
                self.hash.as_bytes(),
                &Ed25519Signature::from_bytes(*s),
                public_key,
            )
            .is_ok()
        })
    }
}

impl std::fmt::Debug for VerifiableCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifiableCredential")
            .field("hash", &self.hash)
            .field("owner", &self.owner_did())
            .field("issuers", &self.issuer_dids())
            .field("signatures", &self.signatures.len())
            .field("is_vc_used", &self.is_vc_used)
            .field("vc_type", &self.vc_type)
            .finish_non_exhaustive()
    }
}

/// JSON view of a credential, with text DIDs and a decoded property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialView {
    /// Hash of record.
    pub hash: Hash256,
    /// Owner DID, human-readable.
    pub owner: String,
    /// Issuer DIDs, human-readable.
    pub issuers: Vec<String>,
    /// Signatures.
    pub signatures: Vec<Ed25519Signature>,
    /// Consumption flag.
    pub is_vc_used: bool,
    /// Decoded property (carries the `vc_type` tag).
    pub property: VcProperty,
}

impl TryFrom<&VerifiableCredential> for CredentialView {
    type Error = VcError;

    fn try_from(vc: &VerifiableCredential) -> Result<Self, Self::Error> {
        Ok(Self {
            hash: vc.hash,
            owner: vc.owner_did().to_text(),
            issuers: vc.issuer_dids().iter().map(Did::to_text).collect(),
            signatures: vc
                .signatures
                .iter()
                .copied()
                .map(Ed25519Signature::from_bytes)
                .collect(),
            is_vc_used: vc.is_vc_used,
            property: vc.property()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hand-built TokenVC in the ledger's SCALE layout: owner did:ssid:rocket,
    // issuers did:ssid:swn and did:ssid:eve, one signature.
    const STORED_VC_HEX: &str = "8fcc460fd98b54c132cdcaed7d6d8a6026b42c8a39b916635738293e39246e916469643a737369643a726f636b65740000000000000000000000000000000000086469643a737369643a73776e00000000000000000000000000000000000000006469643a737369643a657665000000000000000000000000000000000000000004a4f7ff569cd06c680ab90944e5792b8131678d2b4bc36a2431290204046b870d359bd8838622691a1d73fcbb5f41cbf403410d6d2fcd4fec4c35122a7d445686000074657374000000000000000000000000e8030000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn decodes_ledger_bytes() {
        let bytes = hex::decode(STORED_VC_HEX).unwrap();
        let vc = VerifiableCredential::from_scale(&bytes).unwrap();

        assert_eq!(vc.owner_did().to_text(), "did:ssid:rocket");
        let issuers: Vec<String> = vc.issuer_dids().iter().map(Did::to_text).collect();
        assert_eq!(issuers, ["did:ssid:swn", "did:ssid:eve"]);
        assert_eq!(vc.signatures.len(), 1);
        assert!(!vc.is_vc_used);
        assert_eq!(vc.vc_type, VcType::TokenVc);
        assert_eq!(&vc.vc_property[..4], b"test");
        assert_eq!(
            u128::from_le_bytes(vc.vc_property[16..32].try_into().unwrap()),
            1000
        );
        assert_eq!(vc.to_scale(), bytes);
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let bytes = hex::decode(STORED_VC_HEX).unwrap();
        assert!(matches!(
            VerifiableCredential::from_scale(&bytes[..200]),
            Err(VcError::Decode { .. })
        ));
    }

    #[test]
    fn status_discriminants() {
        assert_eq!(VcStatus::Active.encode(), vec![0]);
        assert_eq!(VcStatus::Inactive.encode(), vec![1]);
    }
}
