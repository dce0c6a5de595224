//! # Identifier Canonicalization and Ledger Newtypes
//!
//! Every name the ledger keys on (DIDs, currency codes, token names, content
//! identifiers) has exactly one canonical form: a `0x`-prefixed hex string
//! of a type-specific byte width. [`canonicalize()`] produces that form;
//! the newtypes below carry it through the rest of the SDK.
//!
//! ## Padding Rules
//!
//! - Input already starting with `0x` is assumed canonical-shaped. Its hex
//!   body is right-padded with `'0'` digits to `2 * byte_len`.
//! - Anything else is UTF-8 encoded, hex-encoded, prefixed with `0x` and
//!   padded the same way.
//!
//! `canonicalize()` never truncates and never rejects over-length input.
//! Width is enforced only when a value is converted to fixed ledger bytes
//! (`to_bytes()`), which fails with [`ValidationError::FieldTooLong`].

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hexutil::{decode_fixed, impl_fixed_hex, pad_fixed, text_from_fixed};

/// Width of a DID key on the ledger.
pub const DID_BYTES: usize = 32;
/// Width of a currency code.
pub const CURRENCY_CODE_BYTES: usize = 8;
/// Width of a token name.
pub const TOKEN_NAME_BYTES: usize = 16;
/// Width of a content identifier.
pub const CID_BYTES: usize = 64;
/// Width of a credential's property blob.
pub const VC_PROPERTY_BYTES: usize = 128;
/// Width of DID metadata.
pub const METADATA_BYTES: usize = 32;

/// Prefix of every DID managed by this SDK.
pub const DID_PREFIX: &str = "did:ssid:";

/// Canonicalize `raw` to a `0x` hex string of `byte_len` bytes.
///
/// Idempotent: `canonicalize(&canonicalize(x, n), n) == canonicalize(x, n)`.
pub fn canonicalize(raw: &str, byte_len: usize) -> String {
    let body = match raw.strip_prefix("0x") {
        Some(body) => body.to_string(),
        None => hex::encode(raw.as_bytes()),
    };
    format!("0x{body:0<width$}", width = byte_len * 2)
}

// -- Did ---------------------------------------------------------------------

/// A decentralized identifier in canonical 32-byte hex form.
///
/// Construction is infallible; [`Did::to_bytes()`] is where width is
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Canonicalize a DID given as text (`did:ssid:alice`) or hex.
    pub fn new(raw: &str) -> Self {
        Self(canonicalize(raw, DID_BYTES))
    }

    /// Build `did:ssid:<identifier>` after validating the identifier.
    ///
    /// Identifiers are 3 to 20 ASCII alphanumeric characters.
    pub fn from_identifier(identifier: &str) -> Result<Self, ValidationError> {
        validate_identifier(identifier)?;
        Ok(Self::new(&format!("{DID_PREFIX}{identifier}")))
    }

    /// Rebuild a DID from its ledger key.
    pub fn from_bytes(bytes: [u8; DID_BYTES]) -> Self {
        Self(crate::hexutil::to_prefixed_hex(&bytes))
    }

    /// The fixed 32-byte ledger key.
    pub fn to_bytes(&self) -> Result<[u8; DID_BYTES], ValidationError> {
        decode_fixed::<DID_BYTES>("did", &self.0)
    }

    /// Canonical hex form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Human-readable form, with NUL padding stripped.
    ///
    /// Falls back to the hex form when the body is not valid hex.
    pub fn to_text(&self) -> String {
        match hex::decode(crate::hexutil::strip_prefix(&self.0)) {
            Ok(bytes) => text_from_fixed(&bytes),
            Err(_) => self.0.clone(),
        }
    }
}

impl From<String> for Did {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for Did {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a DID identifier: 3 to 20 ASCII alphanumeric characters.
pub fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    if !(3..=20).contains(&identifier.len()) {
        return Err(ValidationError::InvalidIdentifier {
            input: identifier.to_string(),
            reason: "must be 3 to 20 characters",
        });
    }
    if !identifier.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidIdentifier {
            input: identifier.to_string(),
            reason: "must be ASCII alphanumeric",
        });
    }
    Ok(())
}

// -- CurrencyCode ------------------------------------------------------------

/// An 8-byte token symbol: 1 to 8 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate a currency code given as text (`OTH`) or canonical hex.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let text = if raw.starts_with("0x") {
            let bytes = decode_fixed::<CURRENCY_CODE_BYTES>("currency_code", raw)?;
            text_from_fixed(&bytes)
        } else {
            raw.to_string()
        };
        if text.len() > CURRENCY_CODE_BYTES {
            return Err(ValidationError::FieldTooLong {
                field: "currency_code",
                max: CURRENCY_CODE_BYTES,
                actual: text.len(),
            });
        }
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrencyCode(text));
        }
        Ok(Self(text))
    }

    /// Decode from the fixed ledger field.
    pub fn from_bytes(bytes: &[u8; CURRENCY_CODE_BYTES]) -> Result<Self, ValidationError> {
        Self::new(&text_from_fixed(bytes))
    }

    /// The fixed 8-byte ledger field.
    pub fn to_bytes(&self) -> [u8; CURRENCY_CODE_BYTES] {
        let mut out = [0u8; CURRENCY_CODE_BYTES];
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    /// Canonical hex form.
    pub fn canonical(&self) -> String {
        canonicalize(&self.0, CURRENCY_CODE_BYTES)
    }

    /// The symbol as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// -- Free-text fixed fields --------------------------------------------------

macro_rules! text_field {
    ($(#[$meta:meta])* $ty:ident, $n:expr, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            /// Accept UTF-8 text that fits the field.
            pub fn new(raw: &str) -> Result<Self, ValidationError> {
                if raw.len() > $n {
                    return Err(ValidationError::FieldTooLong {
                        field: $field,
                        max: $n,
                        actual: raw.len(),
                    });
                }
                Ok(Self(raw.to_string()))
            }

            /// Decode from the fixed ledger field, stripping NUL padding.
            pub fn from_bytes(bytes: &[u8; $n]) -> Self {
                Self(text_from_fixed(bytes))
            }

            /// The fixed ledger field, zero-padded.
            pub fn to_bytes(&self) -> [u8; $n] {
                let mut out = [0u8; $n];
                out[..self.0.len()].copy_from_slice(self.0.as_bytes());
                out
            }

            /// Canonical hex form.
            pub fn canonical(&self) -> String {
                canonicalize(&self.0, $n)
            }

            /// The value as text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::new(&raw)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> Self {
                v.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_field!(
    /// A 16-byte token name.
    TokenName,
    TOKEN_NAME_BYTES,
    "token_name"
);

text_field!(
    /// A 64-byte content identifier pointing at off-chain credential content.
    Cid,
    CID_BYTES,
    "cid"
);

// -- AccountId ---------------------------------------------------------------

/// A 32-byte ledger account (the signer's public key bytes).
///
/// The all-zero account is what the ledger returns for "no mapping".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Encode, Decode)]
pub struct AccountId(pub [u8; 32]);

impl_fixed_hex!(AccountId, 32, "account_id");

impl AccountId {
    /// The "no mapping" sentinel.
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

/// Zero-pad free-form metadata to its 32-byte field.
pub fn metadata_bytes(raw: &str) -> Result<[u8; METADATA_BYTES], ValidationError> {
    if raw.starts_with("0x") {
        decode_fixed::<METADATA_BYTES>("metadata", raw)
    } else {
        pad_fixed::<METADATA_BYTES>("metadata", raw.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn did_scenario() {
        let out = canonicalize("did:ssid:rocket", DID_BYTES);
        assert_eq!(
            out,
            format!("0x6469643a737369643a726f636b6574{}", "0".repeat(64 - 30))
        );
        assert_eq!(out.len(), 66);
    }

    #[test]
    fn currency_scenario() {
        assert_eq!(canonicalize("OTH", CURRENCY_CODE_BYTES), "0x4f54480000000000");
    }

    #[test]
    fn hex_input_is_only_padded() {
        assert_eq!(canonicalize("0xab", 4), "0xab000000");
    }

    #[test]
    fn over_length_input_is_not_truncated() {
        let long = "a".repeat(40);
        let out = canonicalize(&long, DID_BYTES);
        assert_eq!(out.len(), 2 + 80);
        assert!(Did::new(&long).to_bytes().is_err());
    }

    #[test]
    fn did_bytes_round_trip() {
        let did = Did::new("did:ssid:alice");
        let bytes = did.to_bytes().unwrap();
        assert_eq!(&bytes[..14], b"did:ssid:alice");
        assert_eq!(Did::from_bytes(bytes), did);
        assert_eq!(did.to_text(), "did:ssid:alice");
    }

    #[test]
    fn did_hex_and_text_forms_agree() {
        let text = Did::new("did:ssid:alice");
        let hex = Did::new(text.as_hex());
        assert_eq!(text, hex);
    }

    #[test]
    fn did_from_identifier_validates() {
        assert!(Did::from_identifier("alice").is_ok());
        assert!(Did::from_identifier("al").is_err());
        assert!(Did::from_identifier("has space").is_err());
        assert!(Did::from_identifier(&"a".repeat(21)).is_err());
    }

    #[test]
    fn currency_code_rules() {
        assert!(CurrencyCode::new("OTH").is_ok());
        assert!(CurrencyCode::new("ABCDEFGH").is_ok());
        assert!(matches!(
            CurrencyCode::new("ABCDEFGHI"),
            Err(ValidationError::FieldTooLong { .. })
        ));
        for bad in ["oth", "OT1", "O H", ""] {
            assert!(
                matches!(CurrencyCode::new(bad), Err(ValidationError::InvalidCurrencyCode(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn currency_code_accepts_canonical_hex() {
        let code = CurrencyCode::new("0x4f54480000000000").unwrap();
        assert_eq!(code.as_str(), "OTH");
        assert_eq!(code.canonical(), "0x4f54480000000000");
        assert_eq!(CurrencyCode::from_bytes(&code.to_bytes()).unwrap(), code);
    }

    #[test]
    fn token_name_too_long() {
        assert!(TokenName::new("sixteen-chars-ok").is_ok());
        assert!(matches!(
            TokenName::new("seventeen-chars-x"),
            Err(ValidationError::FieldTooLong { field: "token_name", .. })
        ));
    }

    #[test]
    fn account_zero_sentinel() {
        assert!(AccountId::ZERO.is_zero());
        assert!(!AccountId([1; 32]).is_zero());
    }

    #[test]
    fn metadata_is_padded() {
        let m = metadata_bytes("meta").unwrap();
        assert_eq!(&m[..4], b"meta");
        assert!(m[4..].iter().all(|b| *b == 0));
        assert!(metadata_bytes(&"x".repeat(33)).is_err());
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(raw in ".{0,40}", n in 1usize..80) {
            let once = canonicalize(&raw, n);
            prop_assert_eq!(canonicalize(&once, n), once);
        }

        #[test]
        fn short_text_has_exact_width(raw in "[a-zA-Z0-9:]{0,32}") {
            let out = canonicalize(&raw, DID_BYTES);
            prop_assert_eq!(out.len(), 2 * DID_BYTES + 2);
        }
    }
}
