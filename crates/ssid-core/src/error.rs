//! # Error Types: Validation Taxonomy
//!
//! Every failure in this module is raised synchronously, before any network
//! interaction. Variants carry the offending input and the expected form so
//! the message is actionable without a debugger.

use thiserror::Error;

/// Malformed input detected locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A value does not fit its fixed-width ledger field.
    #[error("{field} is {actual} bytes, exceeding its {max}-byte field")]
    FieldTooLong {
        /// Field name as it appears in the ledger schema.
        field: &'static str,
        /// Maximum width in bytes.
        max: usize,
        /// Width of the rejected value in bytes.
        actual: usize,
    },

    /// Currency codes are 1 to 8 uppercase ASCII letters.
    #[error("invalid currency code {0:?}: expected 1-8 uppercase ASCII letters")]
    InvalidCurrencyCode(String),

    /// A `0x` string whose body is not valid hex.
    #[error("invalid hex for {field}: {input:?}")]
    InvalidHex {
        /// Field being decoded.
        field: &'static str,
        /// The rejected input.
        input: String,
    },

    /// A fixed-width value whose hex body has the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Field being decoded.
        field: &'static str,
        /// Required width in bytes.
        expected: usize,
        /// Width of the rejected value in bytes.
        actual: usize,
    },

    /// An identifier that violates its syntax rules.
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
        /// Which rule was violated.
        reason: &'static str,
    },

    /// A credential type tag outside the closed set.
    #[error("unknown vc_type {0:?}")]
    UnknownVcType(String),

    /// More fractional digits than the currency's decimal precision allows.
    #[error("amount {amount} has {digits} fractional digits, currency allows {decimal}")]
    PrecisionExceeded {
        /// The human-form amount as given.
        amount: String,
        /// Fractional digits present in the input.
        digits: u32,
        /// Decimal precision of the currency.
        decimal: u8,
    },

    /// Token precision beyond what an exact decimal can represent.
    #[error("decimal {decimal} exceeds the supported maximum of {max}")]
    DecimalTooLarge {
        /// The rejected precision.
        decimal: u8,
        /// Largest supported precision.
        max: u8,
    },

    /// Not a non-negative decimal number.
    #[error("invalid amount {0:?}: expected a non-negative decimal number")]
    InvalidAmount(String),

    /// The converted amount does not fit the target representation.
    #[error("amount {0} overflows the ledger representation")]
    AmountOverflow(String),

    /// Network name outside `local`, `dev`, `testnet`, `mainnet`.
    #[error("invalid network {0:?}")]
    UnknownNetwork(String),
}
