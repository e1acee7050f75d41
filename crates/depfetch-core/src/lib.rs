pub mod config;
pub mod logging;

pub mod base_url;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod journal;
pub mod matcher;
pub mod materialize;
pub mod observer;
pub mod retry;
pub mod scan;
pub mod tally;

pub use base_url::BaseUrl;
pub use error::ConfigError;
pub use extract::{CanonicalPath, PathExtractor, Rejection, UnparsedEntry};
pub use fetch::{FailureReason, FetchOutcome, Fetcher};
pub use matcher::{find_matches, usable_keywords, SourceLine};
pub use materialize::Materializer;
pub use observer::{NoopObserver, ScanObserver};
pub use scan::{ScanSummary, Scanner};
pub use tally::RunTally;
