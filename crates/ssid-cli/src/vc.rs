//! # Credential Subcommand
//!
//! Offline access to the credential wire formats: the 128-byte property
//! blob and the signing payload whose Blake2b-256 digest is the hash of
//! record.
//!
//! Property files are JSON tagged by `vc_type`:
//!
//! ```json
//! {"vc_type": "TokenVC", "token_name": "Otc", "reservable_balance": "1000",
//!  "decimal": 6, "currency_code": "OTC"}
//! ```
//!
//! Draft files wrap a property with its owner and issuers:
//!
//! ```json
//! {"property": {...}, "owner": "did:ssid:alice", "issuers": ["did:ssid:bob"]}
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

use ssid_core::hexutil::{decode_fixed, to_prefixed_hex};
use ssid_core::{Did, Hash256, VC_PROPERTY_BYTES};
use ssid_vc::{CredentialDraft, FieldKind, VcProperty, VcType};

/// Arguments for the `ssid vc` subcommand.
#[derive(Args, Debug)]
pub struct VcArgs {
    #[command(subcommand)]
    pub command: VcCommand,
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum VcCommand {
    /// Encode a property JSON file to its 128-byte hex blob.
    Encode {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Decode a hex property blob to JSON.
    Decode {
        /// Credential type that determines the layout.
        #[arg(long = "type")]
        vc_type: VcType,
        /// Hex blob; shorter input is zero-padded.
        blob: String,
    },

    /// Print the byte layout of a credential type's property.
    Layout {
        #[arg(long = "type")]
        vc_type: VcType,
    },

    /// Print the signing payload and hash of record for a draft file.
    Hash {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// A credential before signing, as read from disk.
#[derive(Debug, Deserialize)]
pub struct DraftFile {
    pub property: VcProperty,
    pub owner: String,
    #[serde(default)]
    pub issuers: Vec<String>,
}

/// Output of `ssid vc hash`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PayloadReport {
    pub vc_type: VcType,
    pub vc_property: String,
    pub payload: String,
    /// `None` for generic credentials, whose hash comes from the content
    /// service.
    pub hash: Option<Hash256>,
}

/// Execute the credential subcommand.
pub fn run_vc(args: &VcArgs) -> Result<u8> {
    match &args.command {
        VcCommand::Encode { file } => {
            println!("{}", encode_file(file)?);
        }
        VcCommand::Decode { vc_type, blob } => {
            let property = decode_blob(*vc_type, blob)?;
            println!("{}", serde_json::to_string_pretty(&property)?);
        }
        VcCommand::Layout { vc_type } => {
            println!("{vc_type} ({VC_PROPERTY_BYTES} bytes)");
            for field in vc_type.layout() {
                let kind = match field.kind {
                    FieldKind::Text => "text",
                    FieldKind::Hash => "hash",
                    FieldKind::U128 => "u128 le",
                    FieldKind::U8 => "u8",
                };
                println!(
                    "  {:>3}..{:<3} {:<20} {kind}",
                    field.offset,
                    field.offset + field.width,
                    field.name
                );
            }
        }
        VcCommand::Hash { file } => {
            let draft: DraftFile = crate::read_json(file)?;
            let report = payload_report(&draft)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(0)
}

/// Encode the property in `path` to `0x` hex.
pub fn encode_file(path: &Path) -> Result<String> {
    let property: VcProperty = crate::read_json(path)?;
    Ok(to_prefixed_hex(&property.encode()))
}

/// Decode a hex blob under `vc_type`'s layout.
pub fn decode_blob(vc_type: VcType, blob: &str) -> Result<VcProperty> {
    let bytes = decode_fixed::<VC_PROPERTY_BYTES>("vc_property", blob.trim())
        .context("invalid property blob")?;
    VcProperty::decode(vc_type, &bytes).with_context(|| format!("not a valid {vc_type} property"))
}

/// Build the signing payload for a draft and hash it where that is local.
pub fn payload_report(draft: &DraftFile) -> Result<PayloadReport> {
    let owner = Did::new(&draft.owner);
    let issuers: Vec<Did> = draft.issuers.iter().map(|i| Did::new(i)).collect();
    let draft = CredentialDraft::new(draft.property.clone(), &owner, &issuers)
        .context("draft does not fit the ledger layout")?;

    let vc_type = draft.vc_type();
    let hash = if vc_type.has_local_hash() {
        Some(draft.local_hash()?)
    } else {
        tracing::warn!("{vc_type} hash of record comes from the content service");
        None
    };

    Ok(PayloadReport {
        vc_type,
        vc_property: to_prefixed_hex(draft.vc_property()),
        payload: to_prefixed_hex(&draft.signing_payload()),
        hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_json() -> serde_json::Value {
        json!({
            "vc_type": "TokenVC",
            "token_name": "Otc",
            "reservable_balance": "1000",
            "decimal": 6,
            "currency_code": "OTC"
        })
    }

    #[test]
    fn encode_then_decode_token_property() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, token_json().to_string()).unwrap();

        let hex = encode_file(&path).unwrap();
        assert_eq!(hex.len(), 2 + 2 * VC_PROPERTY_BYTES);

        let decoded = decode_blob(VcType::TokenVc, &hex).unwrap();
        assert_eq!(serde_json::to_value(&decoded).unwrap(), token_json());
    }

    #[test]
    fn decode_rejects_bad_currency_bytes() {
        // Amount layout with a lowercase currency code at offset 32.
        let mut blob = [0u8; VC_PROPERTY_BYTES];
        blob[32..35].copy_from_slice(b"abc");
        assert!(decode_blob(VcType::MintTokens, &to_prefixed_hex(&blob)).is_err());
    }

    #[test]
    fn hash_report_for_token_draft() {
        let draft: DraftFile = serde_json::from_value(json!({
            "property": token_json(),
            "owner": "did:ssid:alice",
            "issuers": ["did:ssid:bob", "did:ssid:carol"]
        }))
        .unwrap();
        let report = payload_report(&draft).unwrap();
        assert_eq!(report.vc_type, VcType::TokenVc);

        let hash = report.hash.unwrap();
        let payload = hex::decode(report.payload.trim_start_matches("0x")).unwrap();
        assert_eq!(hash, ssid_vc::hash_payload(&payload));
        // type (1) + property (128) + owner (32) + compact(2) (1) + 2 issuers
        assert_eq!(payload.len(), 1 + 128 + 32 + 1 + 64);
    }

    #[test]
    fn generic_draft_has_no_local_hash() {
        let draft: DraftFile = serde_json::from_value(json!({
            "property": {"vc_type": "GenericVC", "cid": "bafy-cid"},
            "owner": "did:ssid:alice",
            "issuers": ["did:ssid:bob"]
        }))
        .unwrap();
        let report = payload_report(&draft).unwrap();
        assert_eq!(report.hash, None);
    }

    #[test]
    fn oversized_owner_is_rejected() {
        let draft: DraftFile = serde_json::from_value(json!({
            "property": token_json(),
            "owner": format!("did:ssid:{}", "x".repeat(40)),
        }))
        .unwrap();
        assert!(payload_report(&draft).is_err());
    }
}
