use std::time::Duration;

use crate::fetch::FetchOutcome;

/// Running totals for one invocation (possibly many documents).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub documents: u64,
    pub matches: u64,
    /// References for which a request was issued.
    pub requests_sent: u64,
    pub unparsed: u64,
    pub already_existed: u64,
    pub saved: u64,
    pub failed: u64,
    pub bytes_saved: u64,
    /// Set once the run is finished.
    pub elapsed: Duration,
}

impl RunTally {
    /// Counts one materialized reference. `sent` is whether a request went out.
    pub fn record(&mut self, outcome: &FetchOutcome, sent: bool) {
        if sent {
            self.requests_sent += 1;
        }
        match outcome {
            FetchOutcome::Saved { bytes, .. } => {
                self.saved += 1;
                self.bytes_saved += bytes;
            }
            FetchOutcome::AlreadyExists { .. } => self.already_existed += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn record_unparsed(&mut self) {
        self.unparsed += 1;
    }
}
