//! Contract-interface descriptor.
//!
//! The deployment tool records every deployed contract in a JSON repository
//! file (`solar.development.json` by default):
//!
//! ```json
//! {
//!   "contracts": {
//!     "TokenPQM.sol": {
//!       "name": "TokenPQM",
//!       "deployName": "TokenPQM.sol",
//!       "address": "a2b3c4...",
//!       "abi": [ ... ],
//!       "txid": "...",
//!       "owner": "q..."
//!     }
//!   }
//! }
//! ```

use crate::address::{hash160_from_hex, Hash160};
use ethers::abi::{Abi, Function};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("contract {name} not found (available: {available})")]
    ContractNotFound { name: String, available: String },

    #[error("contract {name} has an invalid address: {address}")]
    InvalidAddress { name: String, address: String },

    #[error("method {0} not found in contract ABI")]
    UnknownMethod(String),
}

/// The whole repository file.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub contracts: BTreeMap<String, ContractDescriptor>,
}

/// One deployed contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDescriptor {
    pub name: String,
    #[serde(default)]
    pub deploy_name: Option<String>,
    /// Contract address as 40 hex characters.
    pub address: String,
    pub abi: Abi,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub sender_hex: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
}

impl Repository {
    /// Load a repository file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Look up a contract by deploy name, falling back to its contract name.
    pub fn contract(&self, name: &str) -> Result<&ContractDescriptor, DescriptorError> {
        self.contracts
            .get(name)
            .or_else(|| self.contracts.values().find(|c| c.name == name))
            .ok_or_else(|| DescriptorError::ContractNotFound {
                name: name.to_string(),
                available: self.contracts.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }
}

impl ContractDescriptor {
    /// The contract's hash160.
    pub fn address_bytes(&self) -> Result<Hash160, DescriptorError> {
        hash160_from_hex(&self.address).map_err(|_| DescriptorError::InvalidAddress {
            name: self.name.clone(),
            address: self.address.clone(),
        })
    }

    /// Find a method in the ABI.
    pub fn function(&self, method: &str) -> Result<&Function, DescriptorError> {
        self.abi
            .function(method)
            .map_err(|_| DescriptorError::UnknownMethod(method.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REPO_JSON: &str = r#"{
      "contracts": {
        "TokenPQM.sol": {
          "name": "TokenPQM",
          "deployName": "TokenPQM.sol",
          "address": "0123456789abcdef0123456789abcdef01234567",
          "txid": "6b7e2c8f3a1d0e9b5c4f2a7d8e1b0c3f6a9d2e5b8c1f4a7d0e3b6c9f2a5d8e1b",
          "owner": "qZD6MiUWPtSsQSn69tyvCV1YcE1SVvkVH3",
          "createdAt": "2018-06-01T10:00:00.000Z",
          "confirmed": true,
          "abi": [
            {
              "name": "getNumReqs",
              "type": "function",
              "inputs": [],
              "outputs": [{"name": "", "type": "uint256"}],
              "payable": false,
              "constant": true,
              "stateMutability": "view"
            },
            {
              "name": "transfer",
              "type": "function",
              "inputs": [
                {"name": "_to", "type": "address"},
                {"name": "_value", "type": "uint256"}
              ],
              "outputs": [{"name": "", "type": "bool"}],
              "payable": false,
              "constant": false,
              "stateMutability": "nonpayable"
            }
          ]
        }
      },
      "libraries": {}
    }"#;

    #[test]
    fn test_parse_repository() {
        let repo = Repository::from_json(REPO_JSON).unwrap();
        let contract = repo.contract("TokenPQM.sol").unwrap();
        assert_eq!(contract.name, "TokenPQM");
        assert_eq!(contract.deploy_name.as_deref(), Some("TokenPQM.sol"));
        assert_eq!(contract.confirmed, Some(true));
        assert_eq!(contract.address_bytes().unwrap()[0], 0x01);
    }

    #[test]
    fn test_lookup_by_contract_name() {
        let repo = Repository::from_json(REPO_JSON).unwrap();
        assert!(repo.contract("TokenPQM").is_ok());
    }

    #[test]
    fn test_missing_contract_lists_available() {
        let repo = Repository::from_json(REPO_JSON).unwrap();
        let err = repo.contract("Other.sol").unwrap_err();
        assert!(err.to_string().contains("TokenPQM.sol"));
    }

    #[test]
    fn test_function_lookup() {
        let repo = Repository::from_json(REPO_JSON).unwrap();
        let contract = repo.contract("TokenPQM.sol").unwrap();
        let transfer = contract.function("transfer").unwrap();
        assert_eq!(transfer.inputs.len(), 2);
        assert!(matches!(
            contract.function("burn"),
            Err(DescriptorError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REPO_JSON.as_bytes()).unwrap();
        let repo = Repository::load(file.path()).unwrap();
        assert_eq!(repo.contracts.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Repository::load("/nonexistent/solar.json").unwrap_err();
        assert!(matches!(err, DescriptorError::Io { .. }));
    }

    #[test]
    fn test_bad_address() {
        let json = REPO_JSON.replace("0123456789abcdef0123456789abcdef01234567", "xyz");
        let repo = Repository::from_json(&json).unwrap();
        let contract = repo.contract("TokenPQM.sol").unwrap();
        assert!(matches!(
            contract.address_bytes(),
            Err(DescriptorError::InvalidAddress { .. })
        ));
    }
}
