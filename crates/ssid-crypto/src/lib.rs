//! # ssid-crypto: Cryptographic Primitives
//!
//! The SDK decides *which* bytes are hashed and signed. This crate is the
//! boundary to the primitives that do the hashing and signing:
//!
//! - **Blake2b-256** for the hash of record of ledger credentials.
//! - **SHA-256** for off-ledger JSON credentials and schemas.
//! - **Ed25519** key pairs, public keys and signatures.
//! - The [`Signer`] trait, so callers can plug in a remote or hardware
//!   signer instead of an in-process key pair.
//!
//! ## Crate Policy
//!
//! - Depends only on `ssid-core` internally.
//! - No mocking of cryptographic operations in tests.
//! - Private key material is never serialized or logged.

pub mod digest;
pub mod ed25519;
pub mod error;
pub mod signer;

pub use digest::{blake2_256, sha256};
pub use ed25519::{verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
pub use signer::Signer;
