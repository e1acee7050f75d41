//! Retry and backoff policy.
//!
//! Only network-level failures (timeouts, refused or dropped connections)
//! are retried. HTTP error statuses and local storage failures are final.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error};
pub use error::FetchError;
pub use policy::{Backoff, ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
