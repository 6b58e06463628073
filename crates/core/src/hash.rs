//! Transaction ids.

use std::fmt;
use std::str::FromStr;

/// A named alias for a 32-byte(u8) array.
pub type Bytes32 = [u8; 32];

/// A 32-byte value rendered as plain lowercase hex, the way the node prints
/// transaction ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash(pub Bytes32);

/// Identifier of a submitted transaction.
pub type TxId = Hash;

impl Hash {
    /// Create a new Hash from raw bytes.
    pub fn from_bytes(bytes: Bytes32) -> Self {
        Self(bytes)
    }

    /// Convert to a hex string (no prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..8])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
