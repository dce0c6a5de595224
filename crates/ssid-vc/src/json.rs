//! # JSON Credentials and Schemas
//!
//! Off-ledger credentials: a JSON `properties` object, its SHA-256 hash, and
//! the signature of a verifying authority over that hash. Only the schema
//! hash ever reaches the ledger.
//!
//! Hashing serializes `properties` compactly with keys in insertion order,
//! the same text `JSON.stringify` produces for these documents, so hashes
//! agree with credentials and schemas issued by other SSID clients. Key
//! order is therefore significant: `{"a":1,"b":2}` and `{"b":2,"a":1}` are
//! different credentials.
//!
//! Whether the verifier is allowed to sign (validator membership, which
//! key was live at `issued_block`) is a ledger question answered by the SDK
//! client; this module checks integrity and the signature itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ssid_core::{Did, Hash256};
use ssid_crypto::{Ed25519PublicKey, Ed25519Signature, Signer};

use crate::error::VcError;

/// An off-ledger JSON credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonCredential {
    /// Hash of the schema the properties follow.
    pub schema: String,
    /// Credential content.
    pub properties: Value,
    /// SHA-256 of the serialized properties.
    pub hash: Hash256,
    /// DID of the signing authority, once signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<Did>,
    /// Signature over `hash`, once signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Ed25519Signature>,
}

/// SHA-256 of a JSON value's serialized form.
pub fn json_hash(value: &Value) -> Result<Hash256, VcError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(ssid_crypto::sha256(&bytes))
}

/// Create an unsigned credential over `properties`.
pub fn create_json_credential(
    properties: Value,
    schema_hash: &str,
) -> Result<JsonCredential, VcError> {
    let hash = json_hash(&properties)?;
    Ok(JsonCredential {
        schema: schema_hash.to_string(),
        properties,
        hash,
        verifier: None,
        signature: None,
    })
}

impl JsonCredential {
    /// Fail with [`VcError::DataMismatch`] if `hash` no longer matches.
    pub fn check_integrity(&self) -> Result<(), VcError> {
        if json_hash(&self.properties)?.ct_eq(&self.hash) {
            Ok(())
        } else {
            Err(VcError::DataMismatch)
        }
    }

    /// Sign as `verifier`.
    pub fn sign(mut self, verifier: Did, signer: &dyn Signer) -> Result<Self, VcError> {
        self.check_integrity()?;
        let signature = signer.sign(self.hash.as_bytes())?;
        self.verifier = Some(verifier);
        self.signature = Some(signature);
        Ok(self)
    }

    /// Ledger height at which the credential was issued.
    ///
    /// Accepts `issued_block` as a JSON number or a numeric string.
    pub fn issued_block(&self) -> Result<u64, VcError> {
        match self.properties.get("issued_block") {
            Some(Value::Number(n)) => n.as_u64().ok_or(VcError::MissingIssuedBlock),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| VcError::MissingIssuedBlock),
            _ => Err(VcError::MissingIssuedBlock),
        }
    }

    /// The verifier and signature, or [`VcError::NotSigned`].
    pub fn signed_parts(&self) -> Result<(&Did, &Ed25519Signature), VcError> {
        match (&self.verifier, &self.signature) {
            (Some(v), Some(s)) => Ok((v, s)),
            _ => Err(VcError::NotSigned),
        }
    }

    /// Check integrity and the signature against `public_key`.
    pub fn verify_with_key(&self, public_key: &Ed25519PublicKey) -> Result<(), VcError> {
        let (_, signature) = self.signed_parts()?;
        self.check_integrity()?;
        ssid_crypto::verify(self.hash.as_bytes(), signature, public_key)
            .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }
}

/// A self-describing identity credential: the signature is checked against
/// the key named in its own `properties.public_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsidVc {
    /// Identity properties; must carry a hex `public_key`.
    pub properties: Value,
    /// SHA-256 of the serialized properties.
    pub hash: Hash256,
    /// Signature over `hash`, once signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Ed25519Signature>,
}

/// Create an unsigned SSID credential over `properties`.
pub fn create_ssid_vc(properties: Value) -> Result<SsidVc, VcError> {
    let hash = json_hash(&properties)?;
    Ok(SsidVc {
        properties,
        hash,
        signature: None,
    })
}

impl SsidVc {
    /// Sign the hash with `signer`.
    pub fn sign(mut self, signer: &dyn Signer) -> Result<Self, VcError> {
        self.signature = Some(signer.sign(self.hash.as_bytes())?);
        Ok(self)
    }

    /// The key in `properties.public_key`.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, VcError> {
        let raw = self
            .properties
            .get("public_key")
            .and_then(Value::as_str)
            .ok_or(VcError::MissingPublicKey)?;
        Ok(Ed25519PublicKey::from_hex(raw)?)
    }

    /// Check integrity and the signature against the embedded key.
    pub fn verify(&self) -> Result<(), VcError> {
        let signature = self.signature.as_ref().ok_or(VcError::NotSigned)?;
        if !json_hash(&self.properties)?.ct_eq(&self.hash) {
            return Err(VcError::DataMismatch);
        }
        ssid_crypto::verify(self.hash.as_bytes(), signature, &self.public_key()?)
            .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }
}

/// A credential schema ready for `schema.add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Serialized schema properties.
    pub json_data: String,
    /// SHA-256 of `json_data`.
    pub hash: Hash256,
}

/// Serialize `properties` and hash them.
pub fn create_schema(properties: &Value) -> Result<Schema, VcError> {
    let json_data = serde_json::to_string(properties)?;
    let hash = ssid_crypto::sha256(json_data.as_bytes());
    Ok(Schema { json_data, hash })
}
