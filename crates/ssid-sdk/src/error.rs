//! # SDK Error Types
//!
//! Every public SDK operation returns [`SdkError`]. Failures from the lower
//! crates convert through `#[from]`, so `?` works across the whole stack.
//! Ledger dispatch failures keep the ledger's `section.name` code so callers
//! can branch on it.

use ssid_content::ContentError;
use ssid_core::{CurrencyCode, Hash256, ValidationError, VcId};
use ssid_crypto::CryptoError;
use ssid_vc::VcError;
use thiserror::Error;

/// Dispatch code returned when a transfer names a DID with no account.
pub const RECIPIENT_NOT_REGISTERED: &str = "balances.RecipentDIDNotRegistered";

/// Errors from the ledger collaborator itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The connection failed or was closed.
    #[error("ledger transport error: {0}")]
    Transport(String),

    /// The ledger refused the transaction before inclusion.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// Something that was looked up and is not on the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("DID {0} is not registered")]
    Did(String),

    #[error("VC {0} not found")]
    Vc(VcId),

    #[error("no token registered for currency code {0}")]
    Token(CurrencyCode),

    #[error("schema {0} not found")]
    Schema(Hash256),
}

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Input rejected before any network round trip.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Vc(#[from] VcError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// The transaction was included but its dispatch failed. Carries the
    /// `section.name` code from the ledger.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// The verifier of an off-ledger credential is not a validator.
    #[error("signer {0} is not a validator")]
    NotValidator(String),

    #[error("network error: {0}")]
    Network(String),

    /// The transaction never reached a block.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The status stream ended before finalization.
    #[error("transaction status subscription closed before finalization")]
    SubscriptionClosed,
}

impl SdkError {
    /// A stable machine-readable code.
    ///
    /// Dispatch failures return the ledger's own code, for example
    /// `vc.VCAlreadyExists`.
    pub fn code(&self) -> String {
        match self {
            Self::Validation(_) => "sdk.Validation".into(),
            Self::Vc(VcError::AlreadySigned(_)) => "vc.AlreadySigned".into(),
            Self::Vc(VcError::DataMismatch) => "vc.DataMismatch".into(),
            Self::Vc(VcError::NotGeneric(_)) => "vc.NotGeneric".into(),
            Self::Vc(_) => "sdk.Credential".into(),
            Self::Crypto(_) => "sdk.Crypto".into(),
            Self::Content(ContentError::NotFound(_)) => "content.NotFound".into(),
            Self::Content(_) => "content.Unavailable".into(),
            Self::NotFound(NotFound::Did(_)) => "did.DIDNotFound".into(),
            Self::NotFound(NotFound::Vc(_)) => "vc.VCNotFound".into(),
            Self::NotFound(NotFound::Token(_)) => "tokens.TokenNotFound".into(),
            Self::NotFound(NotFound::Schema(_)) => "schema.SchemaNotFound".into(),
            Self::Dispatch(code) => code.clone(),
            Self::NotValidator(_) => "validator.NotValidator".into(),
            Self::Network(_) => "sdk.Network".into(),
            Self::Rejected(_) => "tx.Rejected".into(),
            Self::SubscriptionClosed => "tx.SubscriptionClosed".into(),
        }
    }
}

impl From<LedgerError> for SdkError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Transport(msg) => Self::Network(msg),
            LedgerError::Rejected(msg) => Self::Rejected(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_code_passes_through() {
        let err = SdkError::Dispatch("vc.VCAlreadyExists".into());
        assert_eq!(err.code(), "vc.VCAlreadyExists");
        assert_eq!(err.to_string(), "dispatch failed: vc.VCAlreadyExists");
    }

    #[test]
    fn ledger_errors_map_to_network_and_rejected() {
        let net: SdkError = LedgerError::Transport("socket closed".into()).into();
        assert!(matches!(net, SdkError::Network(_)));
        let rej: SdkError = LedgerError::Rejected("bad nonce".into()).into();
        assert_eq!(rej.code(), "tx.Rejected");
    }

    #[test]
    fn not_found_codes() {
        let err: SdkError = NotFound::Vc(Hash256([1; 32])).into();
        assert_eq!(err.code(), "vc.VCNotFound");
        let err: SdkError = NotFound::Did("0xab".into()).into();
        assert_eq!(err.code(), "did.DIDNotFound");
    }
}
