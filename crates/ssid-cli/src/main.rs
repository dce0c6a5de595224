//! # ssid CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ssid_cli::amount::{run_amount, AmountArgs};
use ssid_cli::identifier::{run_identifier, IdentifierArgs};
use ssid_cli::keys::{run_keys, KeyArgs};
use ssid_cli::vc::{run_vc, VcArgs};

/// SSID offline toolkit.
///
/// Canonicalizes identifiers, encodes credential properties, hashes signing
/// payloads, converts token amounts and manages Ed25519 keys without
/// touching the network.
#[derive(Parser, Debug)]
#[command(name = "ssid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonicalize identifiers to ledger hex, or decode them back to text.
    Id(IdentifierArgs),

    /// Credential property codec and signing payload hashes.
    Vc(VcArgs),

    /// Convert token amounts between highest and lowest form.
    Amount(AmountArgs),

    /// Ed25519 key generation, signing, and signature verification.
    Key(KeyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("ssid CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Id(args) => run_identifier(&args),
        Commands::Vc(args) => run_vc(&args),
        Commands::Amount(args) => run_amount(&args),
        Commands::Key(args) => run_keys(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
