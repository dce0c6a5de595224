//! # Native Balances
//!
//! The native currency has a fixed decimal of 6. Reads come back in highest
//! form; transfer amounts are taken in lowest form, as the ledger expects.

use std::sync::Arc;

use rust_decimal::Decimal;
use ssid_core::{to_highest_form, Did, Hash256, NATIVE_DECIMAL};
use ssid_crypto::Signer;

use crate::did::DidClient;
use crate::error::SdkError;
use crate::ledger::{Ledger, LedgerCall};
use crate::submit::submit_and_watch;

#[derive(Clone)]
pub struct BalanceClient {
    ledger: Arc<dyn Ledger>,
}

impl BalanceClient {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Free native balance of `did`, highest form.
    pub async fn get_balance(&self, did: &Did) -> Result<Decimal, SdkError> {
        let info = self.ledger.account(did).await?;
        Ok(to_highest_form(info.free, NATIVE_DECIMAL)?)
    }

    /// Send `amount` (lowest form) to `receiver`.
    pub async fn send_transaction(
        &self,
        receiver: &Did,
        amount: u128,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let to = self.dids().require_account(receiver).await?;
        let call = LedgerCall::BalancesTransfer { to, amount };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Send `amount` (lowest form) to `receiver` with a memo.
    pub async fn transfer_with_memo(
        &self,
        receiver: &Did,
        amount: u128,
        memo: &str,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let to = self.dids().require_account(receiver).await?;
        let call = LedgerCall::BalancesTransferWithMemo {
            to,
            amount,
            memo: memo.as_bytes().to_vec(),
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    fn dids(&self) -> DidClient {
        DidClient::new(Arc::clone(&self.ledger))
    }
}
