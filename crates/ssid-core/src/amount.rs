//! # Token Amount Normalizer
//!
//! Ledger balances are integers in *lowest form*. Humans read and write
//! *highest form* decimals. The conversion factor is `10^decimal`, where
//! `decimal` comes from the token's ledger descriptor (or [`NATIVE_DECIMAL`]
//! for the native currency).
//!
//! These functions are pure. Fetching the descriptor is the SDK's job.

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Decimal precision of the native currency.
pub const NATIVE_DECIMAL: u8 = 6;

/// Largest token precision a highest-form [`Decimal`] can carry.
pub const MAX_DECIMAL: u8 = 28;

/// Reject a token precision that [`to_highest_form`] could never render.
pub fn check_decimal(decimal: u8) -> Result<(), ValidationError> {
    if decimal > MAX_DECIMAL {
        return Err(ValidationError::DecimalTooLarge {
            decimal,
            max: MAX_DECIMAL,
        });
    }
    Ok(())
}

/// Convert a human-form amount string to lowest form.
///
/// Fractional digits are counted as written, so `"1.50"` has two. More
/// fractional digits than `decimal` is [`ValidationError::PrecisionExceeded`].
pub fn to_lowest_form(human: &str, decimal: u8) -> Result<u128, ValidationError> {
    let trimmed = human.trim();
    let value = Decimal::from_str_exact(trimmed).map_err(|e| match e {
        rust_decimal::Error::ExceedsMaximumPossibleValue
        | rust_decimal::Error::LessThanMinimumPossibleValue => {
            ValidationError::AmountOverflow(trimmed.to_string())
        }
        _ => ValidationError::InvalidAmount(trimmed.to_string()),
    })?;
    lowest_form_of(value, decimal)
}

/// Convert an already-parsed decimal to lowest form.
pub fn lowest_form_of(value: Decimal, decimal: u8) -> Result<u128, ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::InvalidAmount(value.to_string()));
    }
    let digits = value.scale();
    if digits > u32::from(decimal) {
        return Err(ValidationError::PrecisionExceeded {
            amount: value.to_string(),
            digits,
            decimal,
        });
    }
    let overflow = || ValidationError::AmountOverflow(value.to_string());
    let mantissa = u128::try_from(value.mantissa().unsigned_abs()).map_err(|_| overflow())?;
    let factor = 10u128
        .checked_pow(u32::from(decimal) - digits)
        .ok_or_else(overflow)?;
    mantissa.checked_mul(factor).ok_or_else(overflow)
}

/// Convert a lowest-form ledger amount to highest form.
///
/// `decimal` above [`MAX_DECIMAL`] fails with
/// [`ValidationError::DecimalTooLarge`], even for a zero amount.
pub fn to_highest_form(raw: u128, decimal: u8) -> Result<Decimal, ValidationError> {
    check_decimal(decimal)?;
    let overflow = || ValidationError::AmountOverflow(raw.to_string());
    let signed = i128::try_from(raw).map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(signed, u32::from(decimal))
        .map(|d| d.normalize())
        .map_err(|_| overflow())
}
