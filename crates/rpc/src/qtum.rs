//! Qtum node methods used for contract interaction.

use crate::client::{Result, RpcClient};
use pqm_core::Amount;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Result of `callcontract`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    #[serde(default)]
    pub address: String,
    pub execution_result: ExecutionResult,
}

/// EVM execution summary attached to a `callcontract` answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(default)]
    pub gas_used: u64,
    /// `"None"` when the call did not revert.
    pub excepted: String,
    #[serde(default)]
    pub excepted_message: Option<String>,
    /// Hex-encoded return data.
    #[serde(default)]
    pub output: String,
}

impl ExecutionResult {
    pub fn reverted(&self) -> bool {
        self.excepted != "None"
    }
}

/// Result of `sendtocontract`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResult {
    pub txid: String,
    pub sender: String,
    pub hash160: String,
}

/// The subset of `gettransaction` the tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletTransaction {
    pub txid: String,
    /// Negative for conflicted transactions.
    pub confirmations: i64,
}

/// Gas settings for `sendtocontract`.
#[derive(Debug, Clone, Copy)]
pub struct GasSettings {
    pub limit: u64,
    /// Price per gas unit, in QTUM base units.
    pub price: Amount,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            limit: 200_000,
            price: Amount::from_base_units(40),
        }
    }
}

impl RpcClient {
    /// Execute a read-only contract call.
    pub async fn call_contract(
        &self,
        contract_hex: &str,
        data_hex: &str,
        sender: Option<&str>,
    ) -> Result<CallResult> {
        let mut params = vec![json!(contract_hex), json!(data_hex)];
        if let Some(sender) = sender {
            params.push(json!(sender));
        }
        self.call("callcontract", params).await
    }

    /// Broadcast a contract transaction from a wallet address.
    pub async fn send_to_contract(
        &self,
        contract_hex: &str,
        data_hex: &str,
        value: Amount,
        gas: GasSettings,
        sender: &str,
    ) -> Result<SendResult> {
        let params: Vec<Value> = vec![
            json!(contract_hex),
            json!(data_hex),
            json!(value.to_string()),
            json!(gas.limit),
            json!(gas.price.to_string()),
            json!(sender),
        ];
        let result: SendResult = self.call("sendtocontract", params).await?;
        info!(txid = %result.txid, sender = %result.sender, "transaction broadcast");
        Ok(result)
    }

    /// Look up a wallet transaction.
    pub async fn get_transaction(&self, txid: &str) -> Result<WalletTransaction> {
        self.call("gettransaction", vec![json!(txid)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_result_decodes() {
        let raw = json!({
            "address": "0123456789abcdef0123456789abcdef01234567",
            "executionResult": {
                "gasUsed": 21987,
                "excepted": "None",
                "newAddress": "0123456789abcdef0123456789abcdef01234567",
                "output": "000000000000000000000000000000000000000000000000000000000000000a",
                "codeDeposit": 0,
                "gasRefunded": 0,
                "depositSize": 0,
                "gasForDeposit": 0
            },
            "transactionReceipt": {"stateRoot": "00", "gasUsed": 21987, "bloom": "00", "log": []}
        });
        let result: CallResult = serde_json::from_value(raw).unwrap();
        assert!(!result.execution_result.reverted());
        assert_eq!(result.execution_result.gas_used, 21987);
    }

    #[test]
    fn test_reverted_call() {
        let raw = json!({"executionResult": {"excepted": "Revert", "output": ""}});
        let result: CallResult = serde_json::from_value(raw).unwrap();
        assert!(result.execution_result.reverted());
    }

    #[test]
    fn test_wallet_transaction_negative_confirmations() {
        let raw = json!({"txid": "ab", "confirmations": -1});
        let tx: WalletTransaction = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.confirmations, -1);
    }

    #[test]
    fn test_default_gas() {
        let gas = GasSettings::default();
        assert_eq!(gas.limit, 200_000);
        assert_eq!(gas.price.to_string(), "0.00000040");
    }
}
