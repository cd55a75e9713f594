//! Retry ceilings and exponential backoff, wired per operation kind.

use std::time::Duration;

use crate::transport::RequestError;

use super::classify::{classify, ErrorClass};

/// Kind of operation a policy applies to.
///
/// Mutations may not be idempotent, so they get a lower ceiling and never
/// retry on any HTTP status >= 400, even where the generic classification
/// would allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Query,
    Mutation,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with a per-kind attempt ceiling and delay cap.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub kind: OpKind,
    /// Maximum number of attempts (including the first).
    pub ceiling: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy for reads: two attempts, backoff capped at 10s.
    pub fn query() -> Self {
        Self {
            kind: OpKind::Query,
            ceiling: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }

    /// Policy for writes: a single attempt, backoff capped at 5s so a rare
    /// retry never stalls the caller long.
    pub fn mutation() -> Self {
        Self {
            kind: OpKind::Mutation,
            ceiling: 1,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5_000),
        }
    }

    /// Whether to retry after `failure_count` failures ended with `err`.
    ///
    /// Rules, in order: ceiling first, then status-based classification, then
    /// message-based fallback, then a conservative default of retrying
    /// (unclassified failures in this system are usually transient).
    pub fn should_retry(&self, failure_count: u32, err: &RequestError) -> bool {
        if failure_count >= self.ceiling {
            return false;
        }
        if self.kind == OpKind::Mutation && err.status.is_some_and(|s| s >= 400) {
            return false;
        }
        match classify(err) {
            ErrorClass::Client | ErrorClass::Auth => false,
            ErrorClass::Server | ErrorClass::Network | ErrorClass::Unknown => true,
        }
    }

    /// Backoff delay before retry number `attempt_index` (0-based):
    /// `min(base * 2^attempt_index, max_delay)`.
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt_index.min(16));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Combined decision: retry with the computed delay, or stop.
    /// `failure_count` is the number of failures so far (>= 1 when called).
    pub fn decide(&self, failure_count: u32, err: &RequestError) -> RetryDecision {
        if self.should_retry(failure_count, err) {
            RetryDecision::RetryAfter(self.backoff_delay(failure_count.saturating_sub(1)))
        } else {
            RetryDecision::NoRetry
        }
    }
}
