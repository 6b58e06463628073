//! Submitting transactions and waiting for them.

use super::Session;
use anyhow::{Context, Result};
use colored::Colorize;
use pqm_core::ArgValue;
use pqm_rpc::{ConfirmationTracker, Confirmed, ContractClient, SendOptions, TrackerState};

/// Send `method` and, unless disabled, wait for the configured confirmations.
///
/// Returns `None` when the session does not wait.
pub async fn submit<C>(
    session: &Session<'_, C>,
    method: &str,
    args: &[ArgValue],
    options: SendOptions,
) -> Result<Option<Confirmed>>
where
    C: ContractClient + ?Sized,
{
    let handle = session
        .contract
        .send(method, args, &options)
        .await
        .with_context(|| format!("Failed to send {}", method))?;

    println!("{}  {} submitted", "✓".green().bold(), method);
    println!("    Tx:      {}", handle.txid.to_hex().bright_yellow());
    println!("    Sender:  {}", handle.sender.bright_yellow());
    println!("    Hash160: {}", handle.hash160.bright_black());
    if !options.value.is_zero() {
        println!("    Value:   {} QTUM", options.value.to_string().bright_cyan());
    }

    if !session.wait {
        println!();
        println!("Not waiting for confirmations.");
        return Ok(None);
    }

    let required = session.confirmations;
    let tracker = ConfirmationTracker::new(session.contract, session.tracker.clone())
        .with_cancellation(session.cancel.clone());

    let confirmed = tracker
        .await_confirmations(&handle, required, |state| match state {
            TrackerState::Submitted => {
                println!("{}", format!("Waiting for {} confirmation(s)...", required).bold().cyan())
            }
            TrackerState::Polling { confirmations, .. } => {
                println!("    {}/{} confirmations", confirmations, required)
            }
            TrackerState::Confirmed { .. } | TrackerState::Failed => {}
        })
        .await
        .with_context(|| format!("Failed to confirm {}", handle.txid))?;

    println!(
        "{}  Confirmed with {} confirmation(s)",
        "✓".green().bold(),
        confirmed.confirmations.to_string().bright_cyan()
    );
    Ok(Some(confirmed))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session, RecordingClient};
    use super::*;
    use pqm_core::{Address, Amount};

    fn sender() -> Address {
        "qZD6MiUWPtSsQSn69tyvCV1YcE1SVvkVH3".parse().unwrap()
    }

    #[tokio::test]
    async fn test_submit_waits_for_confirmation() {
        let client = RecordingClient::new();
        let confirmed = submit(&session(&client), "refillReqs", &[], SendOptions::new(sender()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.confirmations, 1);
        assert_eq!(client.methods(), vec!["refillReqs"]);
    }

    #[tokio::test]
    async fn test_submit_without_wait() {
        let client = RecordingClient::new();
        let mut session = session(&client);
        session.wait = false;

        let options = SendOptions::new(sender()).with_value(Amount::from_base_units(10));
        let result = submit(&session, "feedContract", &[], options).await.unwrap();

        assert!(result.is_none());
        assert_eq!(client.calls()[0].value, Amount::from_base_units(10));
    }

    #[tokio::test]
    async fn test_cancelled_wait_is_reported() {
        let client = RecordingClient::new();
        let mut session = session(&client);
        session.cancel.cancel();
        session.confirmations = 3;

        let err = submit(&session, "refillReqs", &[], SendOptions::new(sender()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<pqm_rpc::ConfirmationError>(),
            Some(pqm_rpc::ConfirmationError::Cancelled { .. })
        ));
        // the transaction was still sent
        assert_eq!(client.methods(), vec!["refillReqs"]);
    }
}
