//! Single-resource HTTP GET with bounded retry.
//!
//! A fetch streams the body straight to disk, retries only network-level
//! failures, and records every failed request in the bad-request journal.
//! Failures never propagate: they come back as `FetchOutcome::Failed`.

mod parse;
mod sink;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use sink::{temp_path, TEMP_SUFFIX};
pub use transport::{BodySink, CurlOptions, CurlTransport, ResponseHead, Transport};

use std::fmt;
use std::path::Path;

use crate::config::DepfetchConfig;
use crate::extract::CanonicalPath;
use crate::journal::{BadRequest, BadRequestLog};
use crate::observer::ScanObserver;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use sink::FileSink;

/// Why a reference was not saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The server answered with a status other than 200.
    Status(u32),
    /// Connection or timeout failure that outlasted the retry budget.
    Network(String),
    /// Fewer or more bytes than Content-Length announced.
    Truncated { expected: u64, received: u64 },
    /// Local filesystem failure.
    Storage(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "HTTP {}", code),
            FailureReason::Network(e) => write!(f, "network error: {}", e),
            FailureReason::Truncated { expected, received } => {
                write!(f, "truncated: expected {} bytes, got {}", expected, received)
            }
            FailureReason::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl From<&FetchError> for FailureReason {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::Curl(ce) => FailureReason::Network(ce.to_string()),
            FetchError::Http(code) => FailureReason::Status(*code),
            FetchError::PartialTransfer { expected, received } => FailureReason::Truncated {
                expected: *expected,
                received: *received,
            },
            FetchError::Storage(io) => FailureReason::Storage(io.to_string()),
        }
    }
}

/// Result of processing one canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved { path: CanonicalPath, bytes: u64 },
    /// The local file was already present; no request was sent.
    AlreadyExists { path: CanonicalPath },
    Failed {
        path: CanonicalPath,
        reason: FailureReason,
    },
}

impl FetchOutcome {
    pub fn path(&self) -> &CanonicalPath {
        match self {
            FetchOutcome::Saved { path, .. }
            | FetchOutcome::AlreadyExists { path }
            | FetchOutcome::Failed { path, .. } => path,
        }
    }
}

/// Everything a fetch needs to know about one reference.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Matched line the path came from (journaled on failure).
    pub reference: &'a str,
    pub url: &'a str,
    pub path: &'a CanonicalPath,
    /// Absolute local destination.
    pub dest: &'a Path,
}

pub struct Fetcher<T: Transport = CurlTransport> {
    transport: T,
    policy: RetryPolicy,
    verify_length: bool,
    bad_requests: Option<BadRequestLog>,
    requests_sent: u64,
}

impl Fetcher<CurlTransport> {
    /// Curl-backed fetcher configured from `cfg`.
    pub fn from_config(cfg: &DepfetchConfig, bad_requests: BadRequestLog) -> Self {
        Fetcher::new(
            CurlTransport::new(CurlOptions::from(&cfg.http)),
            cfg.retry.policy(),
            Some(bad_requests),
        )
        .verify_length(cfg.http.verify_length)
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy, bad_requests: Option<BadRequestLog>) -> Self {
        Self {
            transport,
            policy,
            verify_length: true,
            bad_requests,
            requests_sent: 0,
        }
    }

    pub fn verify_length(mut self, verify: bool) -> Self {
        self.verify_length = verify;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of references fetched so far (not counting retries).
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    /// GETs `req.url` into `req.dest`. Nothing is left at `req.dest` unless
    /// the outcome is `Saved`.
    pub fn fetch(&mut self, req: &FetchRequest<'_>, observer: &mut dyn ScanObserver) -> FetchOutcome {
        observer.fetch_started(req.url);
        self.requests_sent += 1;
        tracing::info!(url = req.url, dest = %req.dest.display(), "fetching");

        let policy = self.policy;
        let verify = self.verify_length;
        let transport = &mut self.transport;
        let result = run_with_retry(&policy, |attempt| {
            tracing::debug!(attempt, url = req.url, "GET");
            let mut sink = FileSink::new(req.dest, &mut *observer);
            let head = transport.get(req.url, &mut sink)?;
            if head.status != 200 {
                return Err(FetchError::Http(head.status));
            }
            sink.finish(verify)
        });

        match result {
            Ok(bytes) => {
                tracing::info!(path = %req.path, bytes, "saved");
                FetchOutcome::Saved {
                    path: req.path.clone(),
                    bytes,
                }
            }
            Err(e) => {
                let reason = FailureReason::from(&e);
                tracing::warn!(url = req.url, path = %req.path, "not downloaded: {}", reason);
                self.journal_failure(req, &reason);
                FetchOutcome::Failed {
                    path: req.path.clone(),
                    reason,
                }
            }
        }
    }

    /// Appends a failed reference to the bad-request journal, if any.
    pub(crate) fn journal_failure(&self, req: &FetchRequest<'_>, reason: &FailureReason) {
        let Some(log) = &self.bad_requests else {
            return;
        };
        let (status, error) = match reason {
            FailureReason::Status(code) => (Some(*code), None),
            other => (None, Some(other.to_string())),
        };
        let entry = BadRequest {
            reference: req.reference,
            url: req.url,
            path: req.path.as_str(),
            status,
            error,
        };
        if let Err(io) = log.record(&entry) {
            tracing::warn!("could not append to {}: {}", log.path().display(), io);
        }
    }
}
