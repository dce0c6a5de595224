//! # ssid-core: Foundational Types for the SSID SDK
//!
//! Defines the identifier and amount primitives every other crate in the
//! workspace builds on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One canonical form per identifier.** DIDs, currency codes, token names
//!    and content identifiers all map to a `0x`-prefixed hex string of a fixed
//!    byte width through [`canonicalize()`]. Ledger keys are derived from that
//!    form and nothing else.
//!
//! 2. **Newtypes for ledger primitives.** `Did`, `CurrencyCode`, `TokenName`,
//!    `Cid`, `AccountId` and `Hash256` are distinct types. You cannot pass a
//!    currency code where a DID is expected.
//!
//! 3. **Validation before the network.** Every constructor that can fail
//!    returns [`ValidationError`] synchronously, before any ledger or
//!    content-service round trip.
//!
//! 4. **Exact amounts.** Highest-form amounts are `rust_decimal::Decimal`,
//!    lowest-form amounts are `u128`. No floating point anywhere.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ssid-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod digest;
pub mod error;
pub mod hexutil;
pub mod identity;
pub mod network;

// Re-export primary types for ergonomic imports.
pub use amount::{
    check_decimal, lowest_form_of, to_highest_form, to_lowest_form, MAX_DECIMAL, NATIVE_DECIMAL,
};
pub use digest::{Hash256, VcId};
pub use error::ValidationError;
pub use identity::{
    canonicalize, metadata_bytes, validate_identifier, AccountId, Cid, CurrencyCode, Did,
    TokenName, CID_BYTES, CURRENCY_CODE_BYTES, DID_BYTES, DID_PREFIX, METADATA_BYTES,
    TOKEN_NAME_BYTES, VC_PROPERTY_BYTES,
};
pub use network::Network;
