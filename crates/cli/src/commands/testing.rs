//! A contract stand-in that records what handlers ask of it.

use super::Session;
use async_trait::async_trait;
use pqm_core::{Address, Amount, ArgValue, Hash, Token, TxId, U256};
use pqm_rpc::contract::Result;
use pqm_rpc::{ConfirmationSource, ContractClient, SendOptions, TrackerConfig, TxHandle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Call {
    pub kind: &'static str,
    pub method: String,
    pub args: Vec<ArgValue>,
    pub sender: Option<Address>,
    pub value: Amount,
}

impl Call {
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.method)
    }
}

pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    responses: HashMap<String, Vec<Token>>,
    confirmations: u64,
    stalled: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: HashMap::new(),
            confirmations: 1,
            stalled: false,
        }
    }

    /// Make every read-only call hang, like a node that never answers.
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    pub fn with_response(mut self, method: &str, tokens: Vec<Token>) -> Self {
        self.responses.insert(method.to_string(), tokens);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }
}

#[async_trait]
impl ConfirmationSource for RecordingClient {
    async fn confirmations(&self, _txid: &TxId) -> Result<u64> {
        Ok(self.confirmations)
    }
}

#[async_trait]
impl ContractClient for RecordingClient {
    async fn call(
        &self,
        method: &str,
        args: &[ArgValue],
        sender: Option<&Address>,
    ) -> Result<Vec<Token>> {
        self.calls.lock().unwrap().push(Call {
            kind: "call",
            method: method.to_string(),
            args: args.to_vec(),
            sender: sender.copied(),
            value: Amount::ZERO,
        });
        if self.stalled {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| vec![Token::Uint(U256::one())]))
    }

    async fn send(
        &self,
        method: &str,
        args: &[ArgValue],
        options: &SendOptions,
    ) -> Result<TxHandle> {
        self.calls.lock().unwrap().push(Call {
            kind: "send",
            method: method.to_string(),
            args: args.to_vec(),
            sender: Some(options.sender),
            value: options.value,
        });
        Ok(TxHandle {
            txid: Hash::from_bytes([0x11; 32]),
            method: method.to_string(),
            sender: options.sender.to_base58(),
            hash160: options.sender.to_hex(),
        })
    }
}

pub fn session(client: &RecordingClient) -> Session<'_, RecordingClient> {
    Session {
        contract: client,
        confirmations: 1,
        tracker: TrackerConfig {
            poll_interval: Duration::from_millis(1),
            max_polls: Some(5),
        },
        wait: true,
        cancel: CancellationToken::new(),
    }
}
