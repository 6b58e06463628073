//! Confirmation tracking for submitted transactions.
//!
//! The tracker is a small state machine driven by polls against a
//! [`ConfirmationSource`]:
//!
//! ```text
//!   Submitted ──poll──▶ Polling ──poll (count ≥ required)──▶ Confirmed
//!       │                 │  ▲
//!       │                 └──┘ sleep(poll_interval), poll again
//!       └───── query error / cancellation / poll cap ─────▶ Failed
//! ```
//!
//! Waiting is cooperative: both the node query and the sleep between polls
//! race a [`CancellationToken`]. Cancelling only stops the wait; the
//! transaction itself is already broadcast and stays that way.

use crate::contract::{ConfirmationSource, ContractError, TxHandle};
use pqm_core::TxId;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that end a confirmation wait.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("required confirmations must be at least 1")]
    InvalidRequirement,

    #[error("confirmation query for {txid} failed: {source}")]
    Query {
        txid: TxId,
        #[source]
        source: ContractError,
    },

    #[error("stopped waiting for {txid} at {confirmations} confirmation(s)")]
    Cancelled { txid: TxId, confirmations: u64 },

    #[error("{txid} still has {confirmations} confirmation(s) after {polls} polls")]
    Exhausted {
        txid: TxId,
        confirmations: u64,
        polls: u32,
    },
}

/// Observable state of a wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerState {
    /// Handle received, nothing polled yet.
    Submitted,
    /// At least one poll done, requirement not met.
    Polling { polls: u32, confirmations: u64 },
    /// Requirement met.
    Confirmed { polls: u32, confirmations: u64 },
    /// The wait ended without confirmation.
    Failed,
}

/// Successful outcome of a wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub txid: TxId,
    pub confirmations: u64,
    pub polls: u32,
}

/// Polling parameters.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    /// Give up after this many polls (`None` waits indefinitely).
    pub max_polls: Option<u32>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_polls: None,
        }
    }
}

/// Waits for transactions to reach a confirmation count.
pub struct ConfirmationTracker<'a, S: ConfirmationSource + ?Sized> {
    source: &'a S,
    config: TrackerConfig,
    cancel: CancellationToken,
}

impl<'a, S: ConfirmationSource + ?Sized> ConfirmationTracker<'a, S> {
    pub fn new(source: &'a S, config: TrackerConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts a pending wait when cancelled.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until `handle` has at least `required` confirmations.
    ///
    /// `progress` sees every state the wait passes through, starting with
    /// [`TrackerState::Submitted`] and ending with `Confirmed` or `Failed`.
    pub async fn await_confirmations<F>(
        &self,
        handle: &TxHandle,
        required: u64,
        mut progress: F,
    ) -> Result<Confirmed, ConfirmationError>
    where
        F: FnMut(&TrackerState),
    {
        if required == 0 {
            return Err(ConfirmationError::InvalidRequirement);
        }

        let txid = handle.txid;
        progress(&TrackerState::Submitted);

        let mut polls: u32 = 0;
        let mut last_seen: u64 = 0;

        loop {
            let queried = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = self.source.confirmations(&txid) => Some(result),
            };
            let confirmations = match queried {
                Some(Ok(count)) => count,
                Some(Err(source)) => {
                    progress(&TrackerState::Failed);
                    return Err(ConfirmationError::Query { txid, source });
                }
                None => {
                    progress(&TrackerState::Failed);
                    return Err(ConfirmationError::Cancelled {
                        txid,
                        confirmations: last_seen,
                    });
                }
            };
            polls += 1;
            last_seen = confirmations;
            debug!(txid = %txid, polls, confirmations, required, "confirmation poll");

            if confirmations >= required {
                info!(txid = %txid, confirmations, polls, "transaction confirmed");
                progress(&TrackerState::Confirmed {
                    polls,
                    confirmations,
                });
                return Ok(Confirmed {
                    txid,
                    confirmations,
                    polls,
                });
            }

            progress(&TrackerState::Polling {
                polls,
                confirmations,
            });

            if self.config.max_polls.is_some_and(|max| polls >= max) {
                progress(&TrackerState::Failed);
                return Err(ConfirmationError::Exhausted {
                    txid,
                    confirmations,
                    polls,
                });
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    progress(&TrackerState::Failed);
                    return Err(ConfirmationError::Cancelled { txid, confirmations });
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }
}
