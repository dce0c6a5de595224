//! # Key Subcommand
//!
//! Ed25519 key generation, hash-of-record signing, and signature
//! verification.
//!
//! Credential signers sign the 32 bytes of the hash of record, never the
//! payload, so `sign` and `verify` take a hash rather than a document.
//!
//! Key files hold hex text: `{prefix}.key` is the 32-byte seed and
//! `{prefix}.pub` the 32-byte public key.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use ssid_core::Hash256;
use ssid_crypto::{verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Arguments for the `ssid key` subcommand.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Key subcommands.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Generate a new Ed25519 keypair.
    Keygen {
        /// Output directory for the keypair files.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Prefix for the key filenames.
        #[arg(long, default_value = "ssid")]
        prefix: String,
    },

    /// Sign a 32-byte hash of record.
    Sign {
        /// Path to the private key file (hex-encoded 32-byte seed).
        #[arg(long)]
        key: PathBuf,
        /// Hash to sign, `0x`-prefixed hex.
        hash: Hash256,
    },

    /// Verify an Ed25519 signature over a hash of record.
    Verify {
        /// Path to the public key file, or the key itself as hex.
        #[arg(long)]
        pubkey: String,
        /// The signed hash.
        hash: Hash256,
        /// The signature (hex-encoded 64 bytes).
        #[arg(long)]
        signature: String,
    },
}

/// Execute the key subcommand.
pub fn run_keys(args: &KeyArgs) -> Result<u8> {
    match &args.command {
        KeyCommand::Keygen { output, prefix } => cmd_keygen(output, prefix),
        KeyCommand::Sign { key, hash } => {
            let signature = cmd_sign(key, hash)?;
            println!("{signature}");
            Ok(0)
        }
        KeyCommand::Verify {
            pubkey,
            hash,
            signature,
        } => cmd_verify(pubkey, hash, signature),
    }
}

/// Generate a new Ed25519 keypair and write it to files.
fn cmd_keygen(output_dir: &Path, prefix: &str) -> Result<u8> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let pair = Ed25519KeyPair::generate();
    let public_hex = pair.public_key().to_hex();

    let sk_path = output_dir.join(format!("{prefix}.key"));
    let pk_path = output_dir.join(format!("{prefix}.pub"));

    std::fs::write(&sk_path, pair.to_seed_hex().as_bytes())
        .with_context(|| format!("failed to write private key: {}", sk_path.display()))?;
    std::fs::write(&pk_path, &public_hex)
        .with_context(|| format!("failed to write public key: {}", pk_path.display()))?;

    println!("OK: generated Ed25519 keypair");
    println!("  Private key: {}", sk_path.display());
    println!("  Public key:  {}", pk_path.display());
    println!("  Public key (hex): {public_hex}");

    Ok(0)
}

/// Sign `hash` with the seed stored at `key_path`.
fn cmd_sign(key_path: &Path, hash: &Hash256) -> Result<Ed25519Signature> {
    if !key_path.exists() {
        bail!("private key file not found: {}", key_path.display());
    }
    let seed = std::fs::read_to_string(key_path)
        .with_context(|| format!("failed to read private key: {}", key_path.display()))?;
    let pair = Ed25519KeyPair::from_seed_hex(&seed).context("invalid private key")?;
    tracing::debug!(signer = %pair.public_key(), %hash, "signing hash of record");
    Ok(pair.sign(hash.as_bytes()))
}

/// Verify `signature` over `hash`; exit code 1 on a bad signature.
fn cmd_verify(pubkey: &str, hash: &Hash256, signature: &str) -> Result<u8> {
    let public_key = load_public_key(pubkey)?;
    let signature = Ed25519Signature::from_hex(signature).context("invalid signature")?;

    match verify(hash.as_bytes(), &signature, &public_key) {
        Ok(()) => {
            println!("OK: signature is valid");
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: signature verification failed: {e}");
            Ok(1)
        }
    }
}

/// Accept either a path to a `.pub` file or the hex key inline.
fn load_public_key(pubkey: &str) -> Result<Ed25519PublicKey> {
    let path = Path::new(pubkey);
    let text = if path.is_file() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read public key: {}", path.display()))?
    } else {
        pubkey.to_string()
    };
    Ed25519PublicKey::from_hex(&text).context("invalid public key")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> Hash256 {
        Hash256([0x5a; 32])
    }

    #[test]
    fn keygen_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cmd_keygen(dir.path(), "test").unwrap(), 0);

        let key_content = std::fs::read_to_string(dir.path().join("test.key")).unwrap();
        assert_eq!(key_content.len(), 64);

        let pub_content = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        assert_eq!(pub_content.len(), 2 + 64);
        assert!(Ed25519PublicKey::from_hex(&pub_content).is_ok());
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        cmd_keygen(dir.path(), "test").unwrap();

        let signature = cmd_sign(&dir.path().join("test.key"), &hash()).unwrap();
        let pub_path = dir.path().join("test.pub");
        let code = cmd_verify(
            pub_path.to_str().unwrap(),
            &hash(),
            &signature.to_hex(),
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn verify_fails_for_other_hash() {
        let dir = tempfile::tempdir().unwrap();
        cmd_keygen(dir.path(), "test").unwrap();
        let signature = cmd_sign(&dir.path().join("test.key"), &hash()).unwrap();

        let public = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        let code = cmd_verify(&public, &Hash256([0x5b; 32]), &signature.to_hex()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn sign_matches_library_signer() {
        let dir = tempfile::tempdir().unwrap();
        let pair = Ed25519KeyPair::from_seed(&[9u8; 32]);
        let key_path = dir.path().join("fixed.key");
        std::fs::write(&key_path, pair.to_seed_hex().as_bytes()).unwrap();

        let signature = cmd_sign(&key_path, &hash()).unwrap();
        assert_eq!(signature, pair.sign(hash().as_bytes()));
    }

    #[test]
    fn missing_key_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cmd_sign(&dir.path().join("absent.key"), &hash()).is_err());
    }

    #[test]
    fn malformed_signature_is_an_error() {
        let public = Ed25519KeyPair::from_seed(&[1u8; 32]).public_key().to_hex();
        assert!(cmd_verify(&public, &hash(), "0x1234").is_err());
    }
}
