//! # Submit and Watch
//!
//! Signs a call with the signer's next nonce, submits it, and waits on the
//! status stream. Completion is finalization; a dispatch error reported at
//! any stage fails the operation with the ledger's `section.name` code.

use ssid_core::Hash256;
use ssid_crypto::Signer;

use crate::error::SdkError;
use crate::ledger::{Ledger, LedgerCall, SignedTransaction, TxStatus};

/// Submit `call` signed by `signer` and wait for finalization.
///
/// Returns the transaction hash. Cancelling the returned future drops the
/// status subscription.
pub async fn submit_and_watch(
    ledger: &dyn Ledger,
    call: LedgerCall,
    signer: &dyn Signer,
) -> Result<Hash256, SdkError> {
    let account = signer.account_id();
    let name = call.name();
    let nonce = ledger.account_next_index(&account).await?;
    let tx = SignedTransaction::sign(call, nonce, signer)?;
    let tx_hash = tx.hash();
    tracing::debug!(call = name, %account, nonce, tx = %tx_hash, "submitting transaction");

    let mut statuses = ledger.submit(tx).await?;
    while let Some(status) = statuses.recv().await {
        match status {
            TxStatus::Ready | TxStatus::Broadcast => {}
            TxStatus::InBlock { block, result } => {
                result.map_err(|e| dispatch_failed(name, e.code()))?;
                tracing::debug!(call = name, %block, "transaction in block");
            }
            TxStatus::Finalized { block, result } => {
                result.map_err(|e| dispatch_failed(name, e.code()))?;
                tracing::info!(call = name, %block, tx = %tx_hash, "transaction finalized");
                return Ok(tx_hash);
            }
            TxStatus::Invalid(reason) => return Err(SdkError::Rejected(reason)),
            TxStatus::Dropped => return Err(SdkError::Rejected("dropped".into())),
            TxStatus::Usurped(by) => return Err(SdkError::Rejected(format!("usurped by {by}"))),
        }
    }
    Err(SdkError::SubscriptionClosed)
}

fn dispatch_failed(call: &str, code: String) -> SdkError {
    tracing::warn!(call, code = %code, "transaction dispatch failed");
    SdkError::Dispatch(code)
}
