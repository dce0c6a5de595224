//! # Amount Subcommand
//!
//! Converts between human (highest-form) amounts and ledger (lowest-form)
//! integers for a given decimal precision.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use ssid_core::{to_highest_form, to_lowest_form, NATIVE_DECIMAL};

/// Arguments for the `ssid amount` subcommand.
#[derive(Args, Debug)]
pub struct AmountArgs {
    #[command(subcommand)]
    pub command: AmountCommand,
}

/// Amount subcommands.
#[derive(Subcommand, Debug)]
pub enum AmountCommand {
    /// Convert a decimal amount to the ledger integer.
    ToLowest {
        /// Amount as written, e.g. `0.01`.
        amount: String,
        /// Token precision; defaults to the native currency's.
        #[arg(long, default_value_t = NATIVE_DECIMAL)]
        decimal: u8,
    },

    /// Convert a ledger integer to a decimal amount.
    ToHighest {
        /// Lowest-form integer.
        amount: u128,
        /// Token precision; defaults to the native currency's.
        #[arg(long, default_value_t = NATIVE_DECIMAL)]
        decimal: u8,
    },
}

/// Execute the amount subcommand.
pub fn run_amount(args: &AmountArgs) -> Result<u8> {
    match &args.command {
        AmountCommand::ToLowest { amount, decimal } => {
            let raw = to_lowest_form(amount, *decimal)
                .with_context(|| format!("cannot convert {amount} at {decimal} decimals"))?;
            println!("{raw}");
        }
        AmountCommand::ToHighest { amount, decimal } => {
            let human = to_highest_form(*amount, *decimal)
                .with_context(|| format!("cannot convert {amount} at {decimal} decimals"))?;
            println!("{human}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: AmountCommand) -> Result<u8> {
        run_amount(&AmountArgs { command })
    }

    #[test]
    fn conversions_succeed() {
        let code = run(AmountCommand::ToLowest {
            amount: "0.01".into(),
            decimal: 6,
        })
        .unwrap();
        assert_eq!(code, 0);
        let code = run(AmountCommand::ToHighest {
            amount: 10_000,
            decimal: 6,
        })
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn excess_precision_is_an_error() {
        let err = run(AmountCommand::ToLowest {
            amount: "0.0000001".into(),
            decimal: 6,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("0.0000001"));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(run(AmountCommand::ToLowest {
            amount: "ten".into(),
            decimal: 2,
        })
        .is_err());
    }
}
