//! Qtum base58check addresses.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte hash160, the EVM-facing form of an address.
pub type Hash160 = [u8; 20];

/// Version bytes the tool accepts.
pub mod version {
    pub const MAINNET_PUBKEY: u8 = 0x3a;
    pub const MAINNET_SCRIPT: u8 = 0x32;
    pub const TESTNET_PUBKEY: u8 = 0x78;
    pub const TESTNET_SCRIPT: u8 = 0x6e;

    pub const ALL: [u8; 4] = [MAINNET_PUBKEY, MAINNET_SCRIPT, TESTNET_PUBKEY, TESTNET_SCRIPT];
}

/// Errors that can occur while parsing an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 address: {0}")]
    InvalidBase58(String),
    #[error("address payload must be 21 bytes, got {0}")]
    InvalidLength(usize),
    #[error("unknown address version byte 0x{0:02x}")]
    UnknownVersion(u8),
    #[error("invalid hex address: {0}")]
    InvalidHex(String),
}

/// A Qtum address: version byte plus hash160.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    hash160: Hash160,
}

impl Address {
    /// Build an address from its parts.
    pub fn new(version: u8, hash160: Hash160) -> Result<Self, AddressError> {
        if !version::ALL.contains(&version) {
            return Err(AddressError::UnknownVersion(version));
        }
        Ok(Self { version, hash160 })
    }

    /// Parse a base58check string and verify its checksum.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let payload = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(format!("{}: {}", s, e)))?;
        if payload.len() != 21 {
            return Err(AddressError::InvalidLength(payload.len()));
        }
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&payload[1..]);
        Self::new(payload[0], hash160)
    }

    /// Encode as base58check.
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.version);
        payload.extend_from_slice(&self.hash160);
        bs58::encode(payload).with_check().into_string()
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash160(&self) -> &Hash160 {
        &self.hash160
    }

    /// Hex form of the hash160 (no prefix), as the node's contract RPCs expect.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash160)
    }
}

/// Parse a bare 20-byte hex hash160 (with or without 0x prefix).
pub fn hash160_from_hex(s: &str) -> Result<Hash160, AddressError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed).map_err(|_| AddressError::InvalidHex(s.to_string()))?;
    if bytes.len() != 20 {
        return Err(AddressError::InvalidHex(s.to_string()));
    }
    let mut arr = [0u8; 20];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}
