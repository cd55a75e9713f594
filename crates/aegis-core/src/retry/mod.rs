//! Retry and backoff policy.
//!
//! This module encapsulates error classification (client vs server vs
//! network vs auth failures) and exponential backoff decisions so that the
//! query cache and the billing flow share a consistent policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, ErrorClass};
pub use policy::{OpKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
