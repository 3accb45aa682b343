//! Bounded retry for transient storage failures. Connection-level errors
//! during multi-row writes get a short linear backoff and a fresh attempt;
//! anything else surfaces immediately.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(120),
        }
    }
}

impl RetryPolicy {
    /// No sleeping between attempts; used by tests.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }
}

/// Whether the error is a connection-level failure worth retrying.
pub fn is_transient(err: &DbErr) -> bool {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => true,
        other => {
            let message = other.to_string();
            message.contains("connection is broken") || message.contains("pool timed out")
        }
    }
}

/// Runs `op` up to `policy.max_attempts` times, sleeping
/// `base_delay * attempt` between transient failures. The final error is
/// returned unchanged once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && attempt < max_attempts => {
                warn!(attempt, %err, "transient database error, retrying");
                tokio::time::sleep(policy.base_delay * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
