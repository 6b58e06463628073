//! Fixed-point amounts with 8 decimals.
//!
//! QTUM and the PQM token share the same precision, so one type serves both.
//! Parsing never goes through floating point.

use ethers::types::U256;
use std::fmt;
use thiserror::Error;

/// Number of decimal places in one whole coin or token.
pub const DECIMALS: usize = 8;

/// Errors that can occur while parsing an amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("too many decimal places in {0} (max 8)")]
    TooPrecise(String),
    #[error("amount out of range: {0}")]
    Overflow(String),
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// An amount in base units (1 coin = 10^8 base units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub U256);

impl Amount {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn from_base_units(units: u64) -> Self {
        Self(U256::from(units))
    }

    /// Parse a whole number of base units, e.g. `"150000000"`.
    pub fn parse_base_units(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::NotANumber(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| AmountError::Overflow(s.to_string()))
    }

    /// Parse a decimal coin amount, e.g. `"1.5"` or `".25"`.
    pub fn parse_decimal(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::NotANumber(s.to_string()));
        }
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) || !digits(frac) {
            return Err(AmountError::NotANumber(s.to_string()));
        }
        if frac.len() > DECIMALS {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let mut joined = String::with_capacity(whole.len() + DECIMALS);
        joined.push_str(if whole.is_empty() { "0" } else { whole });
        joined.push_str(frac);
        joined.extend(std::iter::repeat('0').take(DECIMALS - frac.len()));

        U256::from_dec_str(&joined)
            .map(Self)
            .map_err(|_| AmountError::Overflow(s.to_string()))
    }

    /// Reject zero.
    pub fn positive(self) -> Result<Self, AmountError> {
        if self.is_zero() {
            Err(AmountError::NotPositive)
        } else {
            Ok(self)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn base_units(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let padded = format!("{:0>width$}", digits, width = DECIMALS + 1);
        let (whole, frac) = padded.split_at(padded.len() - DECIMALS);
        write!(f, "{}.{}", whole, frac)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}
