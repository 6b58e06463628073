//! Value parsers for positional arguments.
//!
//! They run while clap parses the command line, so a malformed value is
//! reported before any node request is made.

use pqm_core::{Address, Amount};

/// A base58 sender address.
pub fn parse_sender(s: &str) -> Result<Address, String> {
    Address::from_base58(s).map_err(|e| format!("invalid sender address `{}`: {}", s, e))
}

/// A QTUM amount in decimal notation, greater than zero.
pub fn parse_coin_amount(s: &str) -> Result<Amount, String> {
    Amount::parse_decimal(s)
        .and_then(Amount::positive)
        .map_err(|e| format!("Invalid amount: {} ({})", s, e))
}

/// A token quantity in base units, greater than zero.
pub fn parse_token_amount(s: &str) -> Result<Amount, String> {
    Amount::parse_base_units(s)
        .and_then(Amount::positive)
        .map_err(|e| format!("Invalid amount: {} ({})", s, e))
}

/// A quantity in base units; zero allowed.
pub fn parse_units(s: &str) -> Result<Amount, String> {
    Amount::parse_base_units(s).map_err(|e| format!("Invalid amount: {} ({})", s, e))
}

/// A 1-based request index.
pub fn parse_index(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err("request indices start at 1".to_string()),
        Ok(index) => Ok(index),
        Err(_) => Err(format!("invalid request index `{}`", s)),
    }
}
