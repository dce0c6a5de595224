//! # DID Action Credentials
//!
//! A `DidVc` authorizes one DID write (add, metadata update, removal, key
//! rotation) on behalf of an issuing validator, letting the write go through
//! without a privileged origin. SCALE layout:
//!
//! ```text
//! hash (32) ‖ issuer (32) ‖ owner (32) ‖ property ‖ signature (64) ‖ vc_type (u8)
//! property = metadata (32) ‖ Option<prev_public_key (32)> ‖ public_key (32)
//! ```
//!
//! The hash is Blake2b-256 of `(vc_type, property, owner, issuer)` and the
//! issuer signs the 32 hash bytes.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use ssid_core::{AccountId, Did, Hash256, DID_BYTES, METADATA_BYTES};
use ssid_crypto::{Ed25519PublicKey, Ed25519Signature, Signer};

use crate::error::VcError;

/// The DID write a credential authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum DidAction {
    /// Register a new DID.
    #[codec(index = 0)]
    Add,
    /// Replace a DID's metadata.
    #[codec(index = 1)]
    Update,
    /// Delete a DID.
    #[codec(index = 2)]
    Remove,
    /// Rotate a DID's key.
    #[codec(index = 3)]
    Rotate,
}

impl std::fmt::Display for DidAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// What the write will leave on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct DidProperty {
    /// Metadata after the write, NUL-padded.
    pub metadata: [u8; METADATA_BYTES],
    /// Key being replaced; set only for rotations.
    pub prev_public_key: Option<AccountId>,
    /// Key bound to the DID after the write.
    pub public_key: AccountId,
}

impl DidProperty {
    /// Property for an action that keeps or sets `public_key`.
    pub fn new(metadata: &str, public_key: AccountId) -> Result<Self, VcError> {
        Ok(Self {
            metadata: ssid_core::metadata_bytes(metadata)?,
            prev_public_key: None,
            public_key,
        })
    }

    /// Property for a rotation from `prev_public_key` to `public_key`.
    pub fn rotation(
        metadata: [u8; METADATA_BYTES],
        prev_public_key: AccountId,
        public_key: AccountId,
    ) -> Self {
        Self {
            metadata,
            prev_public_key: Some(prev_public_key),
            public_key,
        }
    }
}

/// A signed authorization for one DID write.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct DidVc {
    /// Blake2b-256 of the signing payload.
    pub hash: Hash256,
    /// DID of the validator that signed.
    pub issuer: [u8; DID_BYTES],
    /// DID being written.
    pub owner: [u8; DID_BYTES],
    /// State after the write.
    pub property: DidProperty,
    /// Issuer's signature over `hash`.
    pub signature: [u8; 64],
    /// Authorized action.
    pub vc_type: DidAction,
}

/// SCALE encoding of `(action, property, owner, issuer)`.
pub fn did_signing_payload(
    action: DidAction,
    property: &DidProperty,
    owner: &[u8; DID_BYTES],
    issuer: &[u8; DID_BYTES],
) -> Vec<u8> {
    (action, property, owner, issuer).encode()
}

impl DidVc {
    /// Build and sign a credential for `action` on `owner`.
    pub fn create(
        action: DidAction,
        property: DidProperty,
        owner: &Did,
        issuer: &Did,
        signer: &dyn Signer,
    ) -> Result<Self, VcError> {
        let owner = owner.to_bytes()?;
        let issuer = issuer.to_bytes()?;
        let payload = did_signing_payload(action, &property, &owner, &issuer);
        let hash = ssid_crypto::blake2_256(&payload);
        let signature = signer.sign(hash.as_bytes())?;
        Ok(Self {
            hash,
            issuer,
            owner,
            property,
            signature: *signature.as_bytes(),
            vc_type: action,
        })
    }

    /// Decode from SCALE bytes.
    pub fn from_scale(bytes: &[u8]) -> Result<Self, VcError> {
        Self::decode(&mut &bytes[..]).map_err(|e| VcError::decode("DID credential", e))
    }

    /// Encode to SCALE bytes, as attached to a DID call.
    pub fn to_scale(&self) -> Vec<u8> {
        self.encode()
    }

    /// The owner as a [`Did`].
    pub fn owner_did(&self) -> Did {
        Did::from_bytes(self.owner)
    }

    /// The issuer as a [`Did`].
    pub fn issuer_did(&self) -> Did {
        Did::from_bytes(self.issuer)
    }

    /// Fail with [`VcError::DataMismatch`] if `hash` does not cover the content.
    pub fn check_hash(&self) -> Result<(), VcError> {
        let payload = did_signing_payload(self.vc_type, &self.property, &self.owner, &self.issuer);
        if ssid_crypto::blake2_256(&payload).ct_eq(&self.hash) {
            Ok(())
        } else {
            Err(VcError::DataMismatch)
        }
    }

    /// Check the hash and the issuer's signature under `public_key`.
    pub fn verify(&self, public_key: &Ed25519PublicKey) -> Result<(), VcError> {
        self.check_hash()?;
        ssid_crypto::verify(
            self.hash.as_bytes(),
            &Ed25519Signature::from_bytes(self.signature),
            public_key,
        )
        .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }
}
