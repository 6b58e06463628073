//! Core primitives for the pqm contract tool.
//!
//! This crate provides the domain types shared by the RPC layer and the CLI:
//! - Transaction ids and 32-byte words
//! - Qtum base58check addresses
//! - 8-decimal amounts
//! - Contract arguments and result formatting
//! - The contract-interface descriptor

pub mod abi;
pub mod address;
pub mod amount;
pub mod descriptor;
pub mod hash;

// Re-export commonly used types at the crate root
pub use abi::{format_token, token_to_uint, ArgError, ArgValue};
pub use address::{Address, AddressError, Hash160};
pub use amount::{Amount, AmountError, DECIMALS};
pub use descriptor::{ContractDescriptor, DescriptorError, Repository};
pub use hash::{Hash, TxId};

/// ABI types used across the workspace.
pub use ethers::abi::{ParamType, Token};
pub use ethers::types::U256;
