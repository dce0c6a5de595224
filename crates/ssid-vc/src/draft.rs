//! # Credential Drafting and Signing
//!
//! A [`CredentialDraft`] is a credential before it has a hash of record.
//! Its owner and issuers are already in fixed ledger form, so width errors
//! surface here, before anything is signed or submitted.
//!
//! For every type except `GenericVC` the hash is computed locally with
//! [`CredentialDraft::local_hash()`]. A generic draft is finished with the
//! hash the content service returns for its `cid`.

use ssid_core::{Did, Hash256, DID_BYTES, VC_PROPERTY_BYTES};
use ssid_crypto::Signer;

use crate::credential::VerifiableCredential;
use crate::error::VcError;
use crate::payload::{hash_payload, signing_payload};
use crate::property::VcProperty;
use crate::vc_type::VcType;

/// An unsigned credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDraft {
    property: VcProperty,
    vc_property: [u8; VC_PROPERTY_BYTES],
    owner: [u8; DID_BYTES],
    issuers: Vec<[u8; DID_BYTES]>,
}

impl CredentialDraft {
    /// Encode `property` and canonicalize the owner and issuers.
    pub fn new(property: VcProperty, owner: &Did, issuers: &[Did]) -> Result<Self, VcError> {
        let owner = owner.to_bytes()?;
        let issuers = issuers
            .iter()
            .map(Did::to_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            vc_property: property.encode(),
            property,
            owner,
            issuers,
        })
    }

    /// The type tag.
    pub fn vc_type(&self) -> VcType {
        self.property.vc_type()
    }

    /// The typed property.
    pub fn property(&self) -> &VcProperty {
        &self.property
    }

    /// The encoded property blob.
    pub fn vc_property(&self) -> &[u8; VC_PROPERTY_BYTES] {
        &self.vc_property
    }

    /// The signing payload.
    pub fn signing_payload(&self) -> Vec<u8> {
        signing_payload(self.vc_type(), &self.vc_property, &self.owner, &self.issuers)
    }

    /// The locally computed hash of record.
    pub fn local_hash(&self) -> Result<Hash256, VcError> {
        let vc_type = self.vc_type();
        if !vc_type.has_local_hash() {
            return Err(VcError::HashNotLocal(vc_type));
        }
        Ok(hash_payload(&self.signing_payload()))
    }

    /// Sign `hash` and produce the credential with one signature attached.
    pub fn sign_with(
        self,
        hash: Hash256,
        signer: &dyn Signer,
    ) -> Result<VerifiableCredential, VcError> {
        let signature = signer.sign(hash.as_bytes())?;
        Ok(VerifiableCredential {
            hash,
            owner: self.owner,
            issuers: self.issuers,
            signatures: vec![signature.0],
            is_vc_used: false,
            vc_type: self.property.vc_type(),
            vc_property: self.vc_property,
        })
    }
}

/// Build and self-sign a credential whose hash is computed locally.
///
/// Generic credentials need the content service; build those through the
/// SDK client instead.
pub fn generate_vc(
    property: VcProperty,
    owner: &Did,
    issuers: &[Did],
    signer: &dyn Signer,
) -> Result<VerifiableCredential, VcError> {
    let draft = CredentialDraft::new(property, owner, issuers)?;
    let hash = draft.local_hash()?;
    draft.sign_with(hash, signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{AmountVcProperty, GenericVcProperty, TokenVcProperty};
    use ssid_core::{Cid, CurrencyCode, TokenName, VcId};
    use ssid_crypto::Ed25519KeyPair;

    fn token_property() -> VcProperty {
        VcProperty::Token(TokenVcProperty {
            token_name: TokenName::new("test").unwrap(),
            reservable_balance: 1_000_000,
            decimal: 6,
            currency_code: CurrencyCode::new("OTH").unwrap(),
        })
    }

    fn dids(names: &[&str]) -> Vec<Did> {
        names.iter().map(|n| Did::new(n)).collect()
    }

    #[test]
    fn generate_vc_self_signs() {
        let signer = Ed25519KeyPair::from_seed(&[5; 32]);
        let issuers = dids(&["did:ssid:swn", "did:ssid:eve"]);
        let vc = generate_vc(
            token_property(),
            &Did::new("did:ssid:rocket"),
            &issuers,
            &signer,
        )
        .unwrap();

        assert_eq!(vc.signatures.len(), 1);
        assert!(!vc.is_vc_used);
        assert_eq!(vc.vc_type, VcType::TokenVc);
        assert_eq!(vc.local_hash().unwrap(), vc.hash);
        assert!(vc.signed_by(&signer.public_key()));
        assert_eq!(vc.property().unwrap(), token_property());
    }

    #[test]
    fn hash_is_deterministic() {
        let owner = Did::new("did:ssid:rocket");
        let issuers = dids(&["did:ssid:swn"]);
        let a = CredentialDraft::new(token_property(), &owner, &issuers).unwrap();
        let b = CredentialDraft::new(token_property(), &owner, &issuers).unwrap();
        assert_eq!(a.local_hash().unwrap(), b.local_hash().unwrap());
    }

    #[test]
    fn changing_any_field_changes_hash() {
        let owner = Did::new("did:ssid:rocket");
        let issuers = dids(&["did:ssid:swn"]);
        let base = CredentialDraft::new(token_property(), &owner, &issuers)
            .unwrap()
            .local_hash()
            .unwrap();

        let other_owner = CredentialDraft::new(token_property(), &Did::new("did:ssid:rockeu"), &issuers)
            .unwrap()
            .local_hash()
            .unwrap();
        assert_ne!(base, other_owner);

        let more_issuers =
            CredentialDraft::new(token_property(), &owner, &dids(&["did:ssid:swn", "did:ssid:eve"]))
                .unwrap()
                .local_hash()
                .unwrap();
        assert_ne!(base, more_issuers);

        let mint = VcProperty::Mint(AmountVcProperty {
            vc_id: VcId::from([0; 32]),
            currency_code: CurrencyCode::new("OTH").unwrap(),
            amount: 0,
        });
        let other_type = CredentialDraft::new(mint, &owner, &issuers)
            .unwrap()
            .local_hash()
            .unwrap();
        assert_ne!(base, other_type);
    }

    #[test]
    fn generic_hash_is_not_local() {
        let generic = VcProperty::Generic(GenericVcProperty {
            cid: Cid::new("cid-1").unwrap(),
        });
        let draft = CredentialDraft::new(generic.clone(), &Did::new("did:ssid:a"), &[]).unwrap();
        assert!(matches!(
            draft.local_hash(),
            Err(VcError::HashNotLocal(VcType::GenericVc))
        ));
        let signer = Ed25519KeyPair::from_seed(&[1; 32]);
        assert!(generate_vc(generic, &Did::new("did:ssid:a"), &[], &signer).is_err());
    }

    #[test]
    fn over_length_owner_is_rejected() {
        let owner = Did::new(&"x".repeat(40));
        assert!(matches!(
            CredentialDraft::new(token_property(), &owner, &[]),
            Err(VcError::Validation(_))
        ));
    }
}
