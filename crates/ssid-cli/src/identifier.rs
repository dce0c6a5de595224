//! # Identifier Subcommand
//!
//! Canonicalizes identifiers into the `0x` hex form the ledger keys on,
//! and decodes canonical hex back to text.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use ssid_core::hexutil::{strip_prefix, text_from_fixed};
use ssid_core::{canonicalize, Cid, CurrencyCode, Did, TokenName};

/// Arguments for the `ssid id` subcommand.
#[derive(Args, Debug)]
pub struct IdentifierArgs {
    #[command(subcommand)]
    pub command: IdentifierCommand,
}

/// Which ledger field an identifier belongs to.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
    /// 32-byte DID.
    Did,
    /// 8-byte currency code (uppercase letters only).
    Currency,
    /// 16-byte token name.
    Token,
    /// 64-byte content identifier.
    Cid,
}

/// Identifier subcommands.
#[derive(Subcommand, Debug)]
pub enum IdentifierCommand {
    /// Print the canonical hex form of an identifier.
    Canonicalize {
        /// Field the identifier is destined for.
        #[arg(long, value_enum)]
        kind: Option<IdentifierKind>,
        /// Pad to an arbitrary width instead of a known field.
        #[arg(long, conflicts_with = "kind")]
        bytes: Option<usize>,
        /// Text (`did:ssid:alice`) or hex (`0x...`) input.
        value: String,
    },

    /// Decode canonical hex back to text, stripping NUL padding.
    Decode {
        /// `0x`-prefixed hex.
        value: String,
    },
}

/// Execute the identifier subcommand.
pub fn run_identifier(args: &IdentifierArgs) -> Result<u8> {
    match &args.command {
        IdentifierCommand::Canonicalize { kind, bytes, value } => {
            let canonical = match (kind, bytes) {
                (_, Some(n)) => canonicalize(value, *n),
                (Some(kind), None) => canonical_form(*kind, value)?,
                (None, None) => canonical_form(IdentifierKind::Did, value)?,
            };
            println!("{canonical}");
            Ok(0)
        }
        IdentifierCommand::Decode { value } => {
            println!("{}", decode_text(value)?);
            Ok(0)
        }
    }
}

/// Canonical hex of `value` for the given field, with width enforced.
pub fn canonical_form(kind: IdentifierKind, value: &str) -> Result<String> {
    let canonical = match kind {
        IdentifierKind::Did => {
            let did = Did::new(value);
            did.to_bytes()
                .with_context(|| format!("{value} does not fit a DID"))?;
            did.as_hex().to_string()
        }
        IdentifierKind::Currency => CurrencyCode::new(value)
            .with_context(|| format!("invalid currency code {value:?}"))?
            .canonical(),
        IdentifierKind::Token => TokenName::new(value)
            .with_context(|| format!("invalid token name {value:?}"))?
            .canonical(),
        IdentifierKind::Cid => Cid::new(value)
            .with_context(|| format!("invalid content identifier {value:?}"))?
            .canonical(),
    };
    tracing::debug!(?kind, %canonical, "canonicalized");
    Ok(canonical)
}

/// Text carried by a canonical hex identifier.
pub fn decode_text(value: &str) -> Result<String> {
    let bytes = hex::decode(strip_prefix(value.trim()))
        .with_context(|| format!("{value} is not hex"))?;
    Ok(text_from_fixed(&bytes))
}
