//! Waiting for transactions to reach a final status
//!
//! [`TransactionWatcher`] polls `transaction/{hash}/status` until the status
//! leaves the pending class, then fetches the full transaction and turns it
//! into an outcome. Time is read through a [`Clock`] so tests can run the
//! loop without sleeping. Every network read is raced against the time left,
//! so a stalled endpoint still ends in [`SdkError::Timeout`].

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::types::TransactionOnNetwork;
use crate::{ProxyProvider, SdkError};

/// Default delay between two status reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default time allowed for a transaction to execute
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Classified transaction status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Received or still being processed
    Pending,
    /// Executed successfully
    Success,
    /// Executed with failure
    Failed,
    /// Rejected by the protocol
    Invalid,
    /// Status the client does not recognize
    Unknown(String),
}

impl TxStatus {
    /// Classify a raw status string
    pub fn from_status(status: &str) -> Self {
        match status {
            "received" | "pending" | "partially-executed" => Self::Pending,
            "success" | "successful" | "executed" => Self::Success,
            "fail" | "failed" => Self::Failed,
            "invalid" => Self::Invalid,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether the transaction has left the pending class
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Invalid)
    }
}

/// Source of time for the polling loop
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a transaction until it executes or the timeout elapses
pub struct TransactionWatcher<'a> {
    provider: &'a ProxyProvider,
    clock: Box<dyn Clock + 'a>,
    poll_interval: Duration,
    timeout: Duration,
}

impl<'a> TransactionWatcher<'a> {
    /// Watcher with the default interval, timeout and the tokio clock
    pub fn new(provider: &'a ProxyProvider) -> Self {
        Self {
            provider,
            clock: Box::new(TokioClock),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the delay between status reads
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Wait until the transaction leaves the pending class, returning its status
    pub async fn await_status(&self, hash: &str) -> Result<TxStatus, SdkError> {
        let start = self.clock.now();
        self.poll_status(hash, start).await
    }

    async fn poll_status(&self, hash: &str, start: Instant) -> Result<TxStatus, SdkError> {
        let mut round = 0u32;
        loop {
            round += 1;
            let read = self.provider.get_transaction_status(hash);
            match self.within_budget(hash, start, read).await {
                Ok(raw) => {
                    let status = TxStatus::from_status(&raw);
                    tracing::debug!(hash, round, status = %raw, "polled transaction status");
                    if let TxStatus::Unknown(ref unknown) = status {
                        tracing::warn!(hash, status = %unknown, "unrecognized transaction status");
                    }
                    if status.is_executed() {
                        return Ok(status);
                    }
                }
                Err(e @ SdkError::Timeout { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(hash, round, error = %e, "status read failed, retrying");
                }
            }

            let waited = self.clock.now().saturating_duration_since(start);
            if waited >= self.timeout {
                return Err(SdkError::Timeout {
                    hash: hash.to_string(),
                    waited,
                });
            }
            self.clock.sleep(self.poll_interval).await;
        }
    }

    /// Run one network read, giving up once the overall timeout is spent
    async fn within_budget<T>(
        &self,
        hash: &str,
        start: Instant,
        read: impl Future<Output = Result<T, SdkError>>,
    ) -> Result<T, SdkError> {
        let spent = self.clock.now().saturating_duration_since(start);
        let remaining = self.timeout.saturating_sub(spent);
        tokio::select! {
            biased;
            result = read => result,
            _ = self.clock.sleep(remaining) => {
                let waited = self.clock.now().saturating_duration_since(start);
                tracing::warn!(hash, ?waited, "network read did not complete in time");
                Err(SdkError::Timeout {
                    hash: hash.to_string(),
                    waited,
                })
            }
        }
    }

    /// Wait for execution and check the outcome.
    ///
    /// A contract error in the results or logs takes precedence over the
    /// status itself.
    pub async fn await_executed(&self, hash: &str) -> Result<TransactionOnNetwork, SdkError> {
        let start = self.clock.now();
        let status = self.poll_status(hash, start).await?;
        let tx = self
            .within_budget(hash, start, self.provider.get_transaction(hash))
            .await?;

        if let Some(message) = tx.contract_error() {
            return Err(SdkError::ContractError {
                hash: hash.to_string(),
                message,
            });
        }
        match status {
            TxStatus::Failed => Err(SdkError::TxFailed {
                hash: hash.to_string(),
                status: tx.status,
            }),
            TxStatus::Invalid => Err(SdkError::TxInvalid {
                hash: hash.to_string(),
            }),
            _ => {
                tracing::info!(hash, "transaction executed");
                Ok(tx)
            }
        }
    }
}
