//! Reference extraction.
//!
//! Reduces a keyword-bearing line to a canonical relative path using only
//! quote-delimiter heuristics: strip whitespace, take the first quoted
//! literal, drop one leading ".", force a leading "/", and reject directory
//! or degenerate values. Every rejection is appended to the rejection
//! journal for manual review.

mod normalize;
mod path;

pub use normalize::{normalize, ExtractOptions, QuotePriority, Rejection};
pub use path::CanonicalPath;

use crate::journal::RejectionLog;

/// A matched line that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedEntry {
    pub line: String,
    pub reason: Rejection,
}

pub struct PathExtractor {
    options: ExtractOptions,
    journal: Option<RejectionLog>,
}

impl PathExtractor {
    pub fn new(options: ExtractOptions, journal: RejectionLog) -> Self {
        Self {
            options,
            journal: Some(journal),
        }
    }

    /// Extractor that records nothing (dry runs).
    pub fn without_journal(options: ExtractOptions) -> Self {
        Self {
            options,
            journal: None,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Normalizes `line`; on rejection the line is appended to the journal.
    /// A journal write failure is logged, never returned.
    pub fn extract(&self, line: &str) -> Result<CanonicalPath, UnparsedEntry> {
        normalize(line, &self.options).map_err(|reason| {
            let entry = UnparsedEntry {
                line: line.to_string(),
                reason,
            };
            tracing::debug!(reason = reason.tag(), line, "reference not parsed");
            if let Some(journal) = &self.journal {
                if let Err(e) = journal.record(&entry) {
                    tracing::warn!("could not append to {}: {}", journal.path().display(), e);
                }
            }
            entry
        })
    }
}
