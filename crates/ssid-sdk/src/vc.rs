//! # Verifiable Credential Client
//!
//! Builds, stores and co-signs credentials, and answers lifecycle queries.
//!
//! ## Hash of record
//!
//! Token credentials hash locally (Blake2b-256 of the signing payload).
//! Generic credentials take their hash from the content service, keyed by
//! the `cid` in the property blob. Approving or verifying a generic
//! credential therefore refetches the content.

use std::sync::Arc;

use ssid_content::ContentService;
use ssid_core::{
    check_decimal, to_lowest_form, CurrencyCode, Did, Hash256, TokenName, ValidationError, VcId,
};
use ssid_crypto::{Ed25519PublicKey, Signer};
use ssid_vc::{
    AmountVcProperty, ApprovalState, CredentialDraft, JsonCredential, TokenVcProperty, VcError,
    VcProperty, VcStatus, VcType, VerifiableCredential,
};

use crate::did::DidClient;
use crate::error::{NotFound, SdkError};
use crate::ledger::{Ledger, LedgerCall, StoredVc};
use crate::submit::submit_and_watch;
use crate::token::TokenClient;

/// Build a `TokenVC` property from a highest-form reservable balance.
///
/// `decimal` is capped at [`ssid_core::MAX_DECIMAL`] so every balance of the
/// token can be rendered in highest form.
pub fn token_vc_property(
    token_name: &str,
    reservable_balance: &str,
    decimal: u8,
    currency_code: &str,
) -> Result<VcProperty, SdkError> {
    check_decimal(decimal)?;
    Ok(VcProperty::Token(TokenVcProperty {
        token_name: TokenName::new(token_name)?,
        reservable_balance: to_lowest_form(reservable_balance, decimal)?,
        decimal,
        currency_code: CurrencyCode::new(currency_code)?,
    }))
}

/// Credential operations over a ledger connection and a content service.
#[derive(Clone)]
pub struct VcClient {
    ledger: Arc<dyn Ledger>,
    content: Arc<dyn ContentService>,
}

impl VcClient {
    pub fn new(ledger: Arc<dyn Ledger>, content: Arc<dyn ContentService>) -> Self {
        Self { ledger, content }
    }

    /// Build a mint, slash or transfer property from a highest-form amount.
    ///
    /// The amount is scaled with the registered decimal of `currency_code`.
    pub async fn amount_vc_property(
        &self,
        vc_type: VcType,
        vc_id: VcId,
        currency_code: &str,
        amount: &str,
    ) -> Result<VcProperty, SdkError> {
        let currency_code = CurrencyCode::new(currency_code)?;
        let decimal = TokenClient::new(Arc::clone(&self.ledger))
            .require_token_data(&currency_code)
            .await?
            .decimal;
        let property = AmountVcProperty {
            vc_id,
            currency_code,
            amount: to_lowest_form(amount, decimal)?,
        };
        match vc_type {
            VcType::MintTokens => Ok(VcProperty::Mint(property)),
            VcType::SlashTokens => Ok(VcProperty::Slash(property)),
            VcType::TokenTransferVc => Ok(VcProperty::Transfer(property)),
            other => Err(ValidationError::UnknownVcType(format!(
                "{other} does not carry an amount"
            ))
            .into()),
        }
    }

    /// Build and self-sign a credential.
    ///
    /// For generic credentials the hash of record is fetched from the
    /// content service.
    pub async fn generate_vc(
        &self,
        property: VcProperty,
        owner: &Did,
        issuers: &[Did],
        signer: &dyn Signer,
    ) -> Result<VerifiableCredential, SdkError> {
        let draft = CredentialDraft::new(property, owner, issuers)?;
        let hash = match draft.property().cid() {
            Some(cid) => {
                tracing::debug!(%cid, "fetching hash of record for generic credential");
                self.content.fetch_generic_vc(cid).await?.hash
            }
            None => draft.local_hash()?,
        };
        Ok(draft.sign_with(hash, signer)?)
    }

    /// Submit `vc` to the ledger. It is stored inactive.
    pub async fn store_vc(
        &self,
        vc: &VerifiableCredential,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let call = LedgerCall::VcStore { vc: vc.to_scale() };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Co-sign a stored credential as one of its issuers.
    ///
    /// The hash is recomputed (or refetched, for generic credentials) and
    /// must still match the stored one.
    pub async fn approve_vc(&self, vc_id: &VcId, signer: &dyn Signer) -> Result<Hash256, SdkError> {
        let stored = self.require_vc(vc_id).await?;
        let hash = self.hash_of_record(&stored.vc).await?;
        if !hash.ct_eq(&stored.vc.hash) {
            return Err(VcError::DataMismatch.into());
        }
        let signature = signer.sign(hash.as_bytes())?;
        if stored.vc.has_signature(&signature) {
            return Err(VcError::AlreadySigned(vc_id.to_string()).into());
        }
        let call = LedgerCall::VcAddSignature {
            vc_id: *vc_id,
            signature: signature.0,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Override the status of `vc_id`. Authority is checked by the ledger.
    pub async fn update_status(
        &self,
        vc_id: &VcId,
        status: VcStatus,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let call = LedgerCall::VcUpdateStatus {
            vc_id: *vc_id,
            status,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    pub async fn get_vc(&self, vc_id: &VcId) -> Result<Option<StoredVc>, SdkError> {
        Ok(self.ledger.vc(vc_id).await?)
    }

    async fn require_vc(&self, vc_id: &VcId) -> Result<StoredVc, SdkError> {
        self.get_vc(vc_id)
            .await?
            .ok_or_else(|| NotFound::Vc(*vc_id).into())
    }

    pub async fn vc_ids_by_did(&self, did: &Did) -> Result<Vec<VcId>, SdkError> {
        Ok(self.ledger.vc_ids_of(did).await?)
    }

    pub async fn did_by_vc_id(&self, vc_id: &VcId) -> Result<Option<Did>, SdkError> {
        Ok(self.ledger.vc_owner(vc_id).await?)
    }

    /// Last status change and its block.
    pub async fn vc_history(&self, vc_id: &VcId) -> Result<Option<(VcStatus, u64)>, SdkError> {
        Ok(self.ledger.vc_history(vc_id).await?)
    }

    pub async fn vc_approvers(&self, vc_id: &VcId) -> Result<Vec<Did>, SdkError> {
        Ok(self.ledger.vc_approvers(vc_id).await?)
    }

    pub async fn approval_state(&self, vc_id: &VcId) -> Result<ApprovalState, SdkError> {
        let stored = self.require_vc(vc_id).await?;
        Ok(ApprovalState::observe(&stored.vc, stored.status))
    }

    /// The hash `vc` should carry: local for token credentials, fetched for
    /// generic ones.
    pub async fn hash_of_record(&self, vc: &VerifiableCredential) -> Result<Hash256, SdkError> {
        match vc.property()? {
            VcProperty::Generic(p) => Ok(self.content.fetch_generic_vc(&p.cid).await?.hash),
            _ => Ok(vc.local_hash()?),
        }
    }

    /// Refetch the content of a stored generic credential and compare its
    /// hash with the stored one.
    pub async fn verify_generic_vc(&self, vc_id: &VcId) -> Result<bool, SdkError> {
        let stored = self.require_vc(vc_id).await?;
        let VcProperty::Generic(p) = stored.vc.property()? else {
            return Err(VcError::NotGeneric(stored.vc.vc_type).into());
        };
        let fetched = self.content.fetch_generic_vc(&p.cid).await?;
        Ok(fetched.hash.ct_eq(&stored.vc.hash))
    }

    /// Verify an off-ledger JSON credential.
    ///
    /// The verifier must be a validator; its key is the one that controlled
    /// its DID at the credential's `issued_block`. Fails with
    /// [`VcError::DataMismatch`] if the properties were altered.
    pub async fn verify_json_credential(
        &self,
        credential: &JsonCredential,
    ) -> Result<bool, SdkError> {
        credential.check_integrity()?;
        let (verifier, _) = credential.signed_parts()?;
        let dids = DidClient::new(Arc::clone(&self.ledger));
        if !dids.is_validator(verifier).await? {
            return Err(SdkError::NotValidator(verifier.to_string()));
        }
        let issued_block = credential.issued_block()?;
        let Some(account) = dids.resolve_account_at(verifier, Some(issued_block)).await? else {
            tracing::debug!(%verifier, issued_block, "verifier had no key at issue height");
            return Ok(false);
        };
        Ok(credential
            .verify_with_key(&Ed25519PublicKey::from(account))
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_vc_property_normalizes_reservable_balance() {
        let property = token_vc_property("Otc", "0.01", 6, "OTC").unwrap();
        let VcProperty::Token(p) = property else {
            panic!("expected a TokenVC property");
        };
        assert_eq!(p.reservable_balance, 10_000);
        assert_eq!(p.decimal, 6);
    }

    #[test]
    fn token_vc_property_rejects_unrenderable_decimal() {
        let err = token_vc_property("Otc", "0", 29, "OTC").unwrap_err();
        assert!(matches!(
            err,
            SdkError::Validation(ValidationError::DecimalTooLarge { decimal: 29, max: 28 })
        ));
        assert!(token_vc_property("Otc", "0", 28, "OTC").is_ok());
    }
}
