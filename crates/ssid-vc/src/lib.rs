//! # ssid-vc: Verifiable Credentials
//!
//! Everything about a credential that can be computed without talking to
//! the ledger:
//!
//! - **Types** (`vc_type.rs`): the closed set of credential type tags.
//! - **Property codec** (`property.rs`): the fixed 128-byte layout per type.
//! - **Payload** (`payload.rs`): the signing payload and its Blake2b-256
//!   hash of record.
//! - **Credential** (`credential.rs`): the SCALE object the ledger stores.
//! - **Drafts** (`draft.rs`): building and self-signing new credentials.
//! - **Approval** (`approval.rs`): reading lifecycle position from ledger
//!   data.
//! - **DID credentials** (`did_vc.rs`): validator-signed authorizations for
//!   DID writes.
//! - **JSON credentials** (`json.rs`): off-ledger credentials, SSID
//!   identity credentials, and schemas.
//!
//! ## Crate Policy
//!
//! - Depends on `ssid-core` and `ssid-crypto` internally.
//! - The binary layouts are bit-exact with existing ledger data. Changing
//!   field order or width is a breaking change.

pub mod approval;
pub mod credential;
pub mod did_vc;
pub mod draft;
pub mod error;
pub mod json;
pub mod payload;
pub mod property;
pub mod vc_type;

pub use approval::ApprovalState;
pub use credential::{CredentialView, VcStatus, VerifiableCredential};
pub use did_vc::{did_signing_payload, DidAction, DidProperty, DidVc};
pub use draft::{generate_vc, CredentialDraft};
pub use error::VcError;
pub use json::{
    create_json_credential, create_schema, create_ssid_vc, json_hash, JsonCredential, Schema,
    SsidVc,
};
pub use payload::{hash_payload, signing_payload};
pub use property::{
    AmountVcProperty, FieldKind, FieldSpec, GenericVcProperty, TokenVcProperty, VcProperty,
};
pub use vc_type::VcType;
