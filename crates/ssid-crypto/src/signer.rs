//! # Signer Abstraction
//!
//! Credential and transaction signing go through [`Signer`] so the SDK does
//! not care whether the key lives in process memory, an environment
//! variable, or an external device.

use ssid_core::AccountId;

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use crate::error::CryptoError;

/// A source of Ed25519 signatures.
///
/// Implementations must be `Send + Sync` for use across async tasks.
pub trait Signer: Send + Sync {
    /// Sign `message` with the managed key.
    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CryptoError>;

    /// The public half of the managed key.
    fn public_key(&self) -> Ed25519PublicKey;

    /// The ledger account this signer controls.
    fn account_id(&self) -> AccountId {
        self.public_key().account_id()
    }
}

impl Signer for Ed25519KeyPair {
    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CryptoError> {
        Ok(Ed25519KeyPair::sign(self, message))
    }

    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519KeyPair::public_key(self)
    }
}
