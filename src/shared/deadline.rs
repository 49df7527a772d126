//! Per-call deadline for store operations
//!
//! Every statement sent to the database is bounded by the configured
//! query timeout. Exceeding it drops the in-flight future and surfaces
//! [`DomainError::Timeout`]; nothing is retried.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::errors::DomainError;

/// Run `operation` with a hard deadline.
pub async fn with_deadline<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_secs = limit.as_secs(), "store call timed out");
            Err(DomainError::Timeout {
                operation,
                seconds: limit.as_secs(),
            })
        }
    }
}
