//! Contract arguments and results.
//!
//! Command-line arguments stay as text until the ABI of the target method is
//! known; [`ArgValue::to_token`] then applies the encoding the parameter type
//! demands. Results are rendered with [`format_token`].

use crate::address::{hash160_from_hex, Address};
use ethers::abi::{ParamType, Token};
use ethers::types::{I256, H160, U256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while converting an argument to an ABI token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument is empty")]
    Empty,
    #[error("`{value}` is not a valid {expected}")]
    Mismatch { value: String, expected: String },
    #[error("parameter type {0} is not supported on the command line")]
    Unsupported(String),
}

/// A contract argument as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgValue(String);

impl ArgValue {
    pub fn new(raw: impl Into<String>) -> Result<Self, ArgError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ArgError::Empty);
        }
        Ok(Self(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode this argument for a parameter of type `kind`.
    ///
    /// - `address`: base58 Qtum address or 20 hex bytes
    /// - `bytesN`: exactly N hex bytes
    /// - `bytes`: any hex bytes
    /// - `uintN`: decimal integer that fits in N bits
    /// - `bool`: `true` / `false`
    /// - `string`: taken verbatim
    pub fn to_token(&self, kind: &ParamType) -> Result<Token, ArgError> {
        let mismatch = || ArgError::Mismatch {
            value: self.0.clone(),
            expected: kind.to_string(),
        };

        match kind {
            ParamType::Address => {
                let hash160 = match Address::from_base58(&self.0) {
                    Ok(address) => *address.hash160(),
                    Err(_) => hash160_from_hex(&self.0).map_err(|_| mismatch())?,
                };
                Ok(Token::Address(H160::from(hash160)))
            }
            ParamType::FixedBytes(len) => {
                let bytes = decode_hex(&self.0).ok_or_else(mismatch)?;
                if bytes.len() != *len {
                    return Err(mismatch());
                }
                Ok(Token::FixedBytes(bytes))
            }
            ParamType::Bytes => decode_hex(&self.0).map(Token::Bytes).ok_or_else(mismatch),
            ParamType::Uint(bits) => {
                if !self.0.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(mismatch());
                }
                let value = U256::from_dec_str(&self.0).map_err(|_| mismatch())?;
                if value.bits() > *bits {
                    return Err(mismatch());
                }
                Ok(Token::Uint(value))
            }
            ParamType::Bool => match self.0.as_str() {
                "true" => Ok(Token::Bool(true)),
                "false" => Ok(Token::Bool(false)),
                _ => Err(mismatch()),
            },
            ParamType::String => Ok(Token::String(self.0.clone())),
            other => Err(ArgError::Unsupported(other.to_string())),
        }
    }
}

impl FromStr for ArgValue {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Address> for ArgValue {
    fn from(address: Address) -> Self {
        Self(address.to_base58())
    }
}

impl From<U256> for ArgValue {
    fn from(value: U256) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok()
}

/// Render a decoded result the way the console shows it.
pub fn format_token(token: &Token) -> String {
    match token {
        Token::Uint(value) => value.to_string(),
        Token::Int(raw) => I256::from_raw(*raw).to_string(),
        Token::Address(address) => hex::encode(address.as_bytes()),
        Token::FixedBytes(bytes) | Token::Bytes(bytes) => hex::encode(bytes),
        Token::Bool(flag) => flag.to_string(),
        Token::String(text) => text.clone(),
        Token::Array(items) | Token::FixedArray(items) => format!(
            "[{}]",
            items.iter().map(format_token).collect::<Vec<_>>().join(", ")
        ),
        Token::Tuple(items) => format!(
            "({})",
            items.iter().map(format_token).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Extract an unsigned integer result.
pub fn token_to_uint(token: &Token) -> Option<U256> {
    match token {
        Token::Uint(value) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTNET_AB: &str = "qZD6MiUWPtSsQSn69tyvCV1YcE1SVvkVH3";

    fn arg(s: &str) -> ArgValue {
        ArgValue::new(s).unwrap()
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(ArgValue::new("  "), Err(ArgError::Empty));
        assert!("".parse::<ArgValue>().is_err());
    }

    #[test]
    fn test_address_from_base58() {
        let token = arg(TESTNET_AB).to_token(&ParamType::Address).unwrap();
        assert_eq!(token, Token::Address(H160::from([0xab; 20])));
    }

    #[test]
    fn test_address_from_hex() {
        let token = arg(&format!("0x{}", "cd".repeat(20)))
            .to_token(&ParamType::Address)
            .unwrap();
        assert_eq!(token, Token::Address(H160::from([0xcd; 20])));
    }

    #[test]
    fn test_address_rejects_bytes32() {
        let err = arg(&"ab".repeat(32))
            .to_token(&ParamType::Address)
            .unwrap_err();
        assert!(matches!(err, ArgError::Mismatch { .. }));
    }

    #[test]
    fn test_bytes32_exact_length() {
        let value = "11".repeat(32);
        assert_eq!(
            arg(&value).to_token(&ParamType::FixedBytes(32)).unwrap(),
            Token::FixedBytes(vec![0x11; 32])
        );
        assert!(arg("1111").to_token(&ParamType::FixedBytes(32)).is_err());
        assert!(arg(TESTNET_AB).to_token(&ParamType::FixedBytes(32)).is_err());
    }

    #[test]
    fn test_uint_bounds() {
        assert_eq!(
            arg("42").to_token(&ParamType::Uint(256)).unwrap(),
            Token::Uint(U256::from(42))
        );
        assert!(arg("256").to_token(&ParamType::Uint(8)).is_err());
        assert!(arg("255").to_token(&ParamType::Uint(8)).is_ok());
        assert!(arg("-1").to_token(&ParamType::Uint(256)).is_err());
        assert!(arg("0x10").to_token(&ParamType::Uint(256)).is_err());
    }

    #[test]
    fn test_bool_and_string() {
        assert_eq!(
            arg("true").to_token(&ParamType::Bool).unwrap(),
            Token::Bool(true)
        );
        assert!(arg("yes").to_token(&ParamType::Bool).is_err());
        assert_eq!(
            arg("hello").to_token(&ParamType::String).unwrap(),
            Token::String("hello".into())
        );
    }

    #[test]
    fn test_unsupported_type() {
        let kind = ParamType::Array(Box::new(ParamType::Uint(256)));
        assert!(matches!(
            arg("1").to_token(&kind),
            Err(ArgError::Unsupported(_))
        ));
    }

    #[test]
    fn test_format_token() {
        assert_eq!(format_token(&Token::Uint(U256::from(1000))), "1000");
        assert_eq!(
            format_token(&Token::Address(H160::from([0xab; 20]))),
            "ab".repeat(20)
        );
        assert_eq!(format_token(&Token::String("PQM".into())), "PQM");
        assert_eq!(
            format_token(&Token::Array(vec![
                Token::Uint(U256::from(1)),
                Token::Bool(false)
            ])),
            "[1, false]"
        );
        assert_eq!(format_token(&Token::Int(U256::MAX)), "-1");
    }
}
