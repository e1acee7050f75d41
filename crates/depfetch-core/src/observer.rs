//! Hooks for reporting progress while a document is processed.

use crate::extract::UnparsedEntry;
use crate::fetch::FetchOutcome;
use crate::matcher::SourceLine;

/// Receives pipeline events in order. All methods default to no-ops.
pub trait ScanObserver {
    fn document(&mut self, _path: &std::path::Path, _matches: usize) {}
    fn matched(&mut self, _line: &SourceLine) {}
    fn rejected(&mut self, _entry: &UnparsedEntry) {}
    fn fetch_started(&mut self, _url: &str) {}
    /// Bytes written so far and the announced Content-Length, if any.
    fn progress(&mut self, _downloaded: u64, _total: Option<u64>) {}
    fn outcome(&mut self, _outcome: &FetchOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}
