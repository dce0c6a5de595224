use ssid_core::ValidationError;
use ssid_crypto::CryptoError;
use thiserror::Error;

use crate::vc_type::VcType;

/// Errors from credential construction, decoding, and verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// An identifier, code, or amount failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Signing or key parsing failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// SCALE decoding of ledger bytes failed.
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The hash of a generic credential comes from the content service.
    #[error("{0} hash is not computed locally; fetch it from the content service")]
    HashNotLocal(VcType),

    /// An operation that only applies to `GenericVC` was given another type.
    #[error("{0} is not a generic credential")]
    NotGeneric(VcType),

    /// This exact signature is already attached to the credential.
    #[error("credential {0} already carries this signature")]
    AlreadySigned(String),

    /// Stored hash does not match the credential content.
    #[error("Data Mismatch!")]
    DataMismatch,

    /// A JSON credential was verified before being signed.
    #[error("VC Not signed!")]
    NotSigned,

    /// An SSID credential lacks a string `public_key` property.
    #[error("credential properties lack a public_key")]
    MissingPublicKey,

    /// A JSON credential lacks a usable `issued_block` property.
    #[error("credential properties lack a numeric issued_block")]
    MissingIssuedBlock,

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VcError {
    pub(crate) fn decode(what: &'static str, err: parity_scale_codec::Error) -> Self {
        Self::Decode {
            what,
            reason: err.to_string(),
        }
    }
}
