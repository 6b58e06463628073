//! The contract capability handed to command handlers.
//!
//! Handlers never build RPC requests themselves: they receive something that
//! implements [`ContractClient`] and name methods and arguments. [`Contract`]
//! is the node-backed implementation; tests supply their own.

use crate::client::{RpcClient, RpcError};
use crate::qtum::GasSettings;
use async_trait::async_trait;
use pqm_core::{
    Address, Amount, ArgError, ArgValue, ContractDescriptor, DescriptorError, Token, TxId,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during contract interaction.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("method {0} not found in contract ABI")]
    UnknownMethod(String),

    #[error("{method} takes {expected} argument(s), got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of {method}: {source}")]
    Argument {
        method: String,
        index: usize,
        source: ArgError,
    },

    #[error("ABI error in {method}: {message}")]
    Abi { method: String, message: String },

    #[error("{method} reverted: {}", describe_revert(.excepted, .message))]
    Reverted {
        method: String,
        excepted: String,
        message: Option<String>,
    },

    #[error("{method} returned no values")]
    EmptyResult { method: String },

    #[error("invalid node response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub type Result<T> = std::result::Result<T, ContractError>;

fn describe_revert(excepted: &str, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{} ({})", excepted, message),
        None => excepted.to_string(),
    }
}

/// Identifier of a submitted transaction plus the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    pub txid: TxId,
    /// Contract method that was invoked.
    pub method: String,
    /// Sender as reported by the node.
    pub sender: String,
    /// Sender hash160 as reported by the node.
    pub hash160: String,
}

/// Options for a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    pub sender: Address,
    /// QTUM attached to the call.
    pub value: Amount,
}

impl SendOptions {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            value: Amount::ZERO,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

/// Anything that can report how many confirmations a transaction has.
#[async_trait]
pub trait ConfirmationSource: Send + Sync {
    async fn confirmations(&self, txid: &TxId) -> Result<u64>;
}

/// Read and write access to one deployed contract.
#[async_trait]
pub trait ContractClient: ConfirmationSource {
    /// Execute a read-only call and decode every output.
    async fn call(
        &self,
        method: &str,
        args: &[ArgValue],
        sender: Option<&Address>,
    ) -> Result<Vec<Token>>;

    /// Broadcast a transaction invoking `method`.
    async fn send(&self, method: &str, args: &[ArgValue], options: &SendOptions)
        -> Result<TxHandle>;

    /// Execute a read-only call and return its first output.
    async fn call_first(
        &self,
        method: &str,
        args: &[ArgValue],
        sender: Option<&Address>,
    ) -> Result<Token> {
        self.call(method, args, sender)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ContractError::EmptyResult {
                method: method.to_string(),
            })
    }
}

/// A deployed contract reached through a node.
#[derive(Debug)]
pub struct Contract {
    rpc: RpcClient,
    descriptor: ContractDescriptor,
    address_hex: String,
    gas: GasSettings,
}

impl Contract {
    pub fn new(rpc: RpcClient, descriptor: ContractDescriptor, gas: GasSettings) -> Result<Self> {
        let address_hex = hex::encode(descriptor.address_bytes()?);
        Ok(Self {
            rpc,
            descriptor,
            address_hex,
            gas,
        })
    }

    pub fn address_hex(&self) -> &str {
        &self.address_hex
    }

    /// ABI-encode a call to `method`, selector included.
    pub fn encode(&self, method: &str, args: &[ArgValue]) -> Result<Vec<u8>> {
        let function = self
            .descriptor
            .function(method)
            .map_err(|_| ContractError::UnknownMethod(method.to_string()))?;

        if function.inputs.len() != args.len() {
            return Err(ContractError::Arity {
                method: method.to_string(),
                expected: function.inputs.len(),
                got: args.len(),
            });
        }

        let tokens = function
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (param, arg))| {
                arg.to_token(&param.kind)
                    .map_err(|source| ContractError::Argument {
                        method: method.to_string(),
                        index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        function
            .encode_input(&tokens)
            .map_err(|e| ContractError::Abi {
                method: method.to_string(),
                message: e.to_string(),
            })
    }

    /// Decode the hex return data of `method`.
    pub fn decode(&self, method: &str, output_hex: &str) -> Result<Vec<Token>> {
        let function = self
            .descriptor
            .function(method)
            .map_err(|_| ContractError::UnknownMethod(method.to_string()))?;
        let data = hex::decode(output_hex)
            .map_err(|e| ContractError::InvalidResponse(format!("output of {}: {}", method, e)))?;
        function
            .decode_output(&data)
            .map_err(|e| ContractError::Abi {
                method: method.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ConfirmationSource for Contract {
    async fn confirmations(&self, txid: &TxId) -> Result<u64> {
        let tx = self.rpc.get_transaction(&txid.to_hex()).await?;
        if tx.confirmations < 0 {
            debug!(txid = %txid, confirmations = tx.confirmations, "conflicted transaction");
        }
        Ok(tx.confirmations.max(0) as u64)
    }
}

#[async_trait]
impl ContractClient for Contract {
    async fn call(
        &self,
        method: &str,
        args: &[ArgValue],
        sender: Option<&Address>,
    ) -> Result<Vec<Token>> {
        let data = hex::encode(self.encode(method, args)?);
        let sender = sender.map(Address::to_base58);

        let result = self
            .rpc
            .call_contract(&self.address_hex, &data, sender.as_deref())
            .await?;

        let execution = result.execution_result;
        if execution.reverted() {
            warn!(method, excepted = %execution.excepted, "call reverted");
            return Err(ContractError::Reverted {
                method: method.to_string(),
                excepted: execution.excepted,
                message: execution.excepted_message.filter(|m| !m.is_empty()),
            });
        }

        debug!(method, gas_used = execution.gas_used, "call executed");
        self.decode(method, &execution.output)
    }

    async fn send(
        &self,
        method: &str,
        args: &[ArgValue],
        options: &SendOptions,
    ) -> Result<TxHandle> {
        let data = hex::encode(self.encode(method, args)?);

        info!(method, sender = %options.sender, value = %options.value, "submitting transaction");
        let result = self
            .rpc
            .send_to_contract(
                &self.address_hex,
                &data,
                options.value,
                self.gas,
                &options.sender.to_base58(),
            )
            .await?;

        let txid = TxId::from_hex(&result.txid)
            .map_err(|_| ContractError::InvalidResponse(format!("bad txid {}", result.txid)))?;

        Ok(TxHandle {
            txid,
            method: method.to_string(),
            sender: result.sender,
            hash160: result.hash160,
        })
    }
}
