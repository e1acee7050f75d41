//! Fetch error type for retry classification.

use thiserror::Error;

/// Error from a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response status other than 200.
    #[error("HTTP {0}")]
    Http(u32),
    /// Content-Length announced more or fewer bytes than were received.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Local write failed (disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
