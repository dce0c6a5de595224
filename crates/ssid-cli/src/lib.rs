//! # ssid-cli: Offline Tooling for SSID
//!
//! Provides the `ssid` command-line interface. Every subcommand runs
//! locally: nothing here opens a ledger connection or calls the content
//! service.
//!
//! ## Subcommands
//!
//! - `ssid id`: Canonicalize DIDs, currency codes, token names and content
//!   identifiers into their ledger hex form, and back.
//! - `ssid vc`: Encode and decode 128-byte credential properties, print
//!   property layouts, and hash signing payloads.
//! - `ssid amount`: Convert between highest-form and lowest-form amounts.
//! - `ssid key`: Ed25519 key generation, hash signing, and verification.
//!
//! ```bash
//! ssid id canonicalize --kind did did:ssid:alice
//! ssid vc hash draft.json
//! ssid amount to-lowest 0.01 --decimal 6
//! ssid key sign --key alice.key 0x1f2e...
//! ```

pub mod amount;
pub mod identifier;
pub mod keys;
pub mod vc;

use std::path::Path;

use anyhow::{Context, Result};

/// Read and parse a JSON file.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}
