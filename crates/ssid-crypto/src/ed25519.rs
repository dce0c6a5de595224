//! # Ed25519 Signing and Verification
//!
//! Key generation, signing, and verification for credential signatures and
//! transaction authorization.
//!
//! ## Security Invariant
//!
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does not
//!   implement `Serialize`, and its `Debug` output is redacted.
//! - The seed can be exported only as a [`Zeroizing`] string, for key files.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as `0x`-prefixed hex strings, the
//! same form the ledger and the content service use.

use ed25519_dalek::{Signer as _, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssid_core::AccountId;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// An Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; 64]);

/// An Ed25519 key pair for signing operations.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The ledger account controlled by this key.
    pub fn account_id(&self) -> AccountId {
        AccountId(self.0)
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_exact::<32>(s)
            .map_err(|e| CryptoError::KeyError(format!("public key: {e}")))?;
        Ok(Self(bytes))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl From<AccountId> for Ed25519PublicKey {
    fn from(account: AccountId) -> Self {
        Self(account.0)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_exact::<64>(s).map_err(CryptoError::MalformedSignature)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random key pair from the OS CSPRNG.
    pub fn generate() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create a key pair from a hex-encoded seed, as written by key files.
    pub fn from_seed_hex(s: &str) -> Result<Self, CryptoError> {
        let seed = Zeroizing::new(
            decode_exact::<32>(s).map_err(|e| CryptoError::KeyError(format!("seed: {e}")))?,
        );
        Ok(Self::from_seed(&seed))
    }

    /// Export the seed as hex. The returned string is wiped on drop.
    pub fn to_seed_hex(&self) -> Zeroizing<String> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(hex::encode(*seed))
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over `message`.
pub fn verify(
    message: &[u8],
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(message, &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

fn decode_exact<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let body = s.trim();
    let body = body.strip_prefix("0x").unwrap_or(body);
    let bytes = hex::decode(body).map_err(|e| format!("invalid hex: {e}"))?;
    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| format!("expected {N} bytes, got {}", bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(b"hello");
        verify(b"hello", &sig, &kp.public_key()).expect("valid signature should verify");
    }

    #[test]
    fn verify_wrong_key_fails() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let sig = kp1.sign(b"msg");
        assert!(verify(b"msg", &sig, &kp2.public_key()).is_err());
    }

    #[test]
    fn verify_wrong_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(b"original");
        assert!(verify(b"tampered", &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn deterministic_from_seed() {
        let kp1 = Ed25519KeyPair::from_seed(&[42u8; 32]);
        let kp2 = Ed25519KeyPair::from_seed(&[42u8; 32]);
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1.sign(b"x"), kp2.sign(b"x"));
    }

    #[test]
    fn seed_hex_round_trip() {
        let kp = Ed25519KeyPair::generate();
        let hex = kp.to_seed_hex();
        assert_eq!(hex.len(), 64);
        let kp2 = Ed25519KeyPair::from_seed_hex(&hex).unwrap();
        assert_eq!(kp.public_key(), kp2.public_key());
    }

    #[test]
    fn public_key_hex_round_trip() {
        let pk = Ed25519KeyPair::generate().public_key();
        let hex = pk.to_hex();
        assert_eq!(hex.len(), 66);
        assert_eq!(Ed25519PublicKey::from_hex(&hex).unwrap(), pk);
        assert_eq!(Ed25519PublicKey::from_hex(&hex[2..]).unwrap(), pk);
    }

    #[test]
    fn signature_serde_is_hex_string() {
        let sig = Ed25519KeyPair::generate().sign(b"y");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 2 + 2 + 128);
        let back: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert!(Ed25519PublicKey::from_hex("not-hex").is_err());
        assert!(Ed25519PublicKey::from_hex("aabb").is_err());
        assert!(matches!(
            Ed25519Signature::from_hex("aabb"),
            Err(CryptoError::MalformedSignature(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
    }

    #[test]
    fn account_id_is_public_key_bytes() {
        let pk = Ed25519KeyPair::from_seed(&[1; 32]).public_key();
        assert_eq!(pk.account_id().0, pk.0);
        assert_eq!(Ed25519PublicKey::from(pk.account_id()), pk);
    }
}
