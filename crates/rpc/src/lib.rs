//! Node access for the pqm contract tool.
//!
//! This crate provides:
//! - A JSON-RPC client with basic auth
//! - The Qtum contract methods (`callcontract`, `sendtocontract`, `gettransaction`)
//! - The [`ContractClient`] capability handed to command handlers
//! - A confirmation tracker for submitted transactions

pub mod client;
pub mod confirm;
pub mod contract;
pub mod qtum;

// Re-export commonly used types
pub use client::{RpcClient, RpcError};
pub use confirm::{
    ConfirmationError, ConfirmationTracker, Confirmed, TrackerConfig, TrackerState,
};
pub use contract::{
    ConfirmationSource, Contract, ContractClient, ContractError, SendOptions, TxHandle,
};
pub use qtum::{CallResult, ExecutionResult, GasSettings, SendResult, WalletTransaction};
