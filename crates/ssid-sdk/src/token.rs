//! # Token Client
//!
//! Token issuance, supply and transfers. Amounts cross this API in highest
//! form (`"12.5"`) and are scaled with the token's registered decimal
//! before they reach the ledger.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ssid_core::{to_highest_form, to_lowest_form, CurrencyCode, Did, Hash256, VcId};
use ssid_crypto::Signer;
use ssid_vc::VcProperty;

use crate::did::DidClient;
use crate::error::{NotFound, SdkError};
use crate::ledger::{Ledger, LedgerCall, TokenDescriptor};
use crate::submit::submit_and_watch;

/// A token balance in highest form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Spendable balance.
    pub free: Decimal,
    /// Balance set aside at issuance.
    pub reserved: Decimal,
    /// Balance that cannot move.
    pub frozen: Decimal,
}

/// A balance lock in highest form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockView {
    /// Lock identifier as text.
    pub id: String,
    /// Locked amount.
    pub amount: Decimal,
}

#[derive(Clone)]
pub struct TokenClient {
    ledger: Arc<dyn Ledger>,
}

impl TokenClient {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn token_data(
        &self,
        currency_code: &CurrencyCode,
    ) -> Result<Option<TokenDescriptor>, SdkError> {
        Ok(self.ledger.token_data(currency_code).await?)
    }

    /// Token metadata, or [`NotFound::Token`].
    pub async fn require_token_data(
        &self,
        currency_code: &CurrencyCode,
    ) -> Result<TokenDescriptor, SdkError> {
        self.token_data(currency_code)
            .await?
            .ok_or_else(|| NotFound::Token(currency_code.clone()).into())
    }

    /// Scale `amount` with the registered decimal of `currency_code`.
    pub async fn to_lowest_form(
        &self,
        currency_code: &CurrencyCode,
        amount: &str,
    ) -> Result<u128, SdkError> {
        let decimal = self.require_token_data(currency_code).await?.decimal;
        Ok(to_lowest_form(amount, decimal)?)
    }

    async fn to_highest(&self, currency_code: &CurrencyCode, raw: u128) -> Result<Decimal, SdkError> {
        let decimal = self.require_token_data(currency_code).await?.decimal;
        Ok(to_highest_form(raw, decimal)?)
    }

    pub async fn token_balance(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<TokenBalance, SdkError> {
        let decimal = self.require_token_data(currency_code).await?.decimal;
        let account = self.ledger.token_account(did, currency_code).await?;
        Ok(TokenBalance {
            free: to_highest_form(account.free, decimal)?,
            reserved: to_highest_form(account.reserved, decimal)?,
            frozen: to_highest_form(account.frozen, decimal)?,
        })
    }

    pub async fn total_issuance(&self, currency_code: &CurrencyCode) -> Result<Decimal, SdkError> {
        let raw = self.ledger.total_issuance(currency_code).await?;
        self.to_highest(currency_code, raw).await
    }

    pub async fn locks(
        &self,
        did: &Did,
        currency_code: &CurrencyCode,
    ) -> Result<Vec<LockView>, SdkError> {
        let decimal = self.require_token_data(currency_code).await?.decimal;
        self.ledger
            .locks(did, currency_code)
            .await?
            .into_iter()
            .map(|lock| {
                Ok(LockView {
                    id: ssid_core::hexutil::text_from_fixed(&lock.id),
                    amount: to_highest_form(lock.amount, decimal)?,
                })
            })
            .collect()
    }

    pub async fn token_issuer(&self, currency_code: &CurrencyCode) -> Result<Option<Did>, SdkError> {
        Ok(self.ledger.token_issuer(currency_code).await?)
    }

    /// Issue the token described by an active `TokenVC`.
    ///
    /// `total_issuance` is scaled with the decimal the credential declares.
    pub async fn issue_token(
        &self,
        vc_id: &VcId,
        total_issuance: &str,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let stored = self
            .ledger
            .vc(vc_id)
            .await?
            .ok_or(NotFound::Vc(*vc_id))?;
        let decimal = match stored.vc.property()? {
            VcProperty::Token(p) => p.decimal,
            _ => {
                return Err(ssid_core::ValidationError::UnknownVcType(format!(
                    "{} cannot issue a token",
                    stored.vc.vc_type
                ))
                .into())
            }
        };
        let call = LedgerCall::TokensIssue {
            vc_id: *vc_id,
            amount: to_lowest_form(total_issuance, decimal)?,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Mint the amount named by an active `MintTokens` credential.
    pub async fn mint_token(&self, vc_id: &VcId, signer: &dyn Signer) -> Result<Hash256, SdkError> {
        let call = LedgerCall::TokensMint { vc_id: *vc_id };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Slash the amount named by an active `SlashTokens` credential.
    pub async fn slash_token(&self, vc_id: &VcId, signer: &dyn Signer) -> Result<Hash256, SdkError> {
        let call = LedgerCall::TokensSlash { vc_id: *vc_id };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Transfer the amount named by an active `TokenTransferVC` to `receiver`.
    pub async fn transfer_token_with_vc(
        &self,
        vc_id: &VcId,
        receiver: &Did,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        self.require_registered(receiver).await?;
        let call = LedgerCall::TokensTransferWithVc {
            vc_id: *vc_id,
            to: receiver.to_bytes()?,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    pub async fn transfer(
        &self,
        receiver: &Did,
        currency_code: &CurrencyCode,
        amount: &str,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        self.require_registered(receiver).await?;
        let call = LedgerCall::TokensTransfer {
            to: receiver.to_bytes()?,
            currency_code: currency_code.to_bytes(),
            amount: self.to_lowest_form(currency_code, amount).await?,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Transfer the signer's whole free balance of `currency_code`.
    pub async fn transfer_all(
        &self,
        receiver: &Did,
        currency_code: &CurrencyCode,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        self.require_registered(receiver).await?;
        let call = LedgerCall::TokensTransferAll {
            to: receiver.to_bytes()?,
            currency_code: currency_code.to_bytes(),
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Move `amount` out of `from`'s reserved balance into `to`.
    pub async fn withdraw_reserved(
        &self,
        to: &Did,
        from: &Did,
        currency_code: &CurrencyCode,
        amount: &str,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        self.require_registered(to).await?;
        let call = LedgerCall::TokensWithdrawReserved {
            to: to.to_bytes()?,
            from: from.to_bytes()?,
            currency_code: currency_code.to_bytes(),
            amount: self.to_lowest_form(currency_code, amount).await?,
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    async fn require_registered(&self, did: &Did) -> Result<(), SdkError> {
        DidClient::new(Arc::clone(&self.ledger))
            .require_account(did)
            .await
            .map(|_| ())
    }
}
