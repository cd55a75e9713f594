//! Drive an async operation through the retry policy.

use std::future::Future;

use crate::transport::RequestError;

use super::policy::{RetryDecision, RetryPolicy};

/// Runs an async operation until it succeeds or the policy says to stop.
/// On retryable failure, sleeps for the backoff delay then tries again.
/// Retries are strictly sequential; the caller only sees the settled outcome.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let mut failures = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures += 1;
                match policy.decide(failures, &err) {
                    RetryDecision::NoRetry => return Err(err),
                    RetryDecision::RetryAfter(delay) => {
                        tracing::debug!(
                            failures,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "retrying after backoff"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
