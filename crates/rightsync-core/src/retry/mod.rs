//! Retry and backoff policy for catalog requests.
//!
//! Classifies transport failures (timeouts, throttling, connection errors,
//! 5xx) and decides exponential backoff so every fetch in a run shares one
//! policy. Login is never retried.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
