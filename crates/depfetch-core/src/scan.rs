//! One-document pipeline: match lines, extract paths, materialize them.
//!
//! Each matched line is fully resolved before the next one starts.
//! Per-reference failures are journaled and counted; none of them stop the
//! scan.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use crate::base_url::BaseUrl;
use crate::config::DepfetchConfig;
use crate::error::ConfigError;
use crate::extract::PathExtractor;
use crate::fetch::{CurlTransport, FetchOutcome, Fetcher, Transport};
use crate::journal::{BadRequestLog, RejectionLog};
use crate::matcher::{find_matches, usable_keywords};
use crate::materialize::Materializer;
use crate::observer::ScanObserver;
use crate::tally::RunTally;

/// Counts for a single document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub matches: usize,
    pub unparsed: usize,
    pub saved: usize,
    pub already_existed: usize,
    pub failed: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Saved { .. } => self.saved += 1,
            FetchOutcome::AlreadyExists { .. } => self.already_existed += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

pub struct Scanner<T: Transport = CurlTransport> {
    keywords: Vec<String>,
    extractor: PathExtractor,
    materializer: Materializer<T>,
    base: BaseUrl,
    tally: RunTally,
    started: Instant,
}

impl Scanner<CurlTransport> {
    /// Curl-backed scanner writing under `root`, with both journals inside it.
    pub fn from_config(cfg: &DepfetchConfig, base: BaseUrl, root: &Path) -> Result<Self, ConfigError> {
        let dir_err = |source| ConfigError::OutputDir {
            path: root.to_path_buf(),
            source,
        };
        fs::create_dir_all(root).map_err(dir_err)?;
        let root = root.canonicalize().map_err(dir_err)?;

        let bad_requests = BadRequestLog::new(root.join(&cfg.bad_request_log));
        let fetcher = Fetcher::from_config(cfg, bad_requests);
        let rejections = RejectionLog::new(root.join(&cfg.rejection_log));
        let extractor = PathExtractor::new(cfg.extract.options(), rejections);
        let materializer = Materializer::new(&root, fetcher)?;
        Scanner::new(cfg.keywords.clone(), extractor, materializer, base)
    }
}

impl<T: Transport> Scanner<T> {
    pub fn new(
        keywords: Vec<String>,
        extractor: PathExtractor,
        materializer: Materializer<T>,
        base: BaseUrl,
    ) -> Result<Self, ConfigError> {
        let keywords = usable_keywords(keywords)?;
        Ok(Self {
            keywords,
            extractor,
            materializer,
            base,
            tally: RunTally::default(),
            started: Instant::now(),
        })
    }

    pub fn root(&self) -> &Path {
        self.materializer.root()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn materializer(&self) -> &Materializer<T> {
        &self.materializer
    }

    pub fn tally(&self) -> &RunTally {
        &self.tally
    }

    /// Reads `path` (lossily decoded) and scans it.
    pub fn scan_file(&mut self, path: &Path, observer: &mut dyn ScanObserver) -> io::Result<ScanSummary> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        tracing::info!(file = %path.display(), "scanning");
        Ok(self.scan_document(Some(path), &text, observer))
    }

    pub fn scan_text(&mut self, text: &str, observer: &mut dyn ScanObserver) -> ScanSummary {
        self.scan_document(None, text, observer)
    }

    fn scan_document(
        &mut self,
        path: Option<&Path>,
        text: &str,
        observer: &mut dyn ScanObserver,
    ) -> ScanSummary {
        let matches = find_matches(text, &self.keywords);
        if let Some(path) = path {
            observer.document(path, matches.len());
        }
        if matches.is_empty() {
            tracing::info!(keywords = ?self.keywords, "no matches");
        }
        self.tally.documents += 1;
        self.tally.matches += matches.len() as u64;

        let mut summary = ScanSummary {
            matches: matches.len(),
            ..ScanSummary::default()
        };

        for line in &matches {
            observer.matched(line);
            match self.extractor.extract(&line.content) {
                Err(entry) => {
                    observer.rejected(&entry);
                    self.tally.record_unparsed();
                    summary.unparsed += 1;
                }
                Ok(path) => {
                    let sent_before = self.materializer.fetcher().requests_sent();
                    let outcome =
                        self.materializer
                            .materialize(&line.content, &path, &self.base, observer);
                    let sent = self.materializer.fetcher().requests_sent() > sent_before;
                    self.tally.record(&outcome, sent);
                    summary.record(&outcome);
                    observer.outcome(&outcome);
                }
            }
        }
        summary
    }

    /// Stops the clock and returns the final tally.
    pub fn finish(mut self) -> RunTally {
        self.tally.elapsed = self.started.elapsed();
        tracing::info!(
            sent = self.tally.requests_sent,
            unparsed = self.tally.unparsed,
            already_existed = self.tally.already_existed,
            elapsed_ms = self.tally.elapsed.as_millis() as u64,
            "run finished"
        );
        self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;
    use crate::fetch::testing::Scripted;
    use crate::observer::NoopObserver;
    use crate::retry::RetryPolicy;

    struct Fixture {
        dir: tempfile::TempDir,
        scanner: Scanner<Scripted>,
    }

    fn fixture(transport: Scripted) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(
            transport,
            RetryPolicy::immediate(5),
            Some(BadRequestLog::new(dir.path().join("bad_requests.txt"))),
        );
        let materializer = Materializer::new(dir.path(), fetcher).unwrap();
        let extractor = PathExtractor::new(
            ExtractOptions::default(),
            RejectionLog::new(dir.path().join("not_parsed.txt")),
        );
        let scanner = Scanner::new(
            vec!["include".to_string(), "require".to_string()],
            extractor,
            materializer,
            BaseUrl::parse("example.com").unwrap(),
        )
        .unwrap();
        Fixture { dir, scanner }
    }

    #[test]
    fn end_to_end_single_include() {
        let mut fx = fixture(Scripted::serving(b"<?php $db = 1;", 1));
        let summary = fx
            .scanner
            .scan_text("<?php\ninclude('./core/config.php');\n", &mut NoopObserver);

        assert_eq!(summary.matches, 1);
        assert_eq!(summary.saved, 1);
        assert_eq!(
            fx.scanner.materializer().fetcher().transport().urls,
            vec!["http://example.com/core/config.php"]
        );
        assert_eq!(
            fs::read(fx.dir.path().join("core/config.php")).unwrap(),
            b"<?php $db = 1;"
        );

        let tally = fx.scanner.finish();
        assert_eq!(tally.requests_sent, 1);
        assert_eq!(tally.unparsed, 0);
        assert_eq!(tally.already_existed, 0);
    }

    #[test]
    fn comment_false_positive_is_unparsed() {
        let mut fx = fixture(Scripted::always_refused());
        let summary = fx
            .scanner
            .scan_text("// include the db config\n", &mut NoopObserver);
        assert_eq!(summary.matches, 1);
        assert_eq!(summary.unparsed, 1);

        let journal = fs::read_to_string(fx.dir.path().join("not_parsed.txt")).unwrap();
        assert_eq!(journal.lines().count(), 1);

        let tally = fx.scanner.finish();
        assert_eq!(tally.unparsed, 1);
        assert_eq!(tally.requests_sent, 0);
    }

    #[test]
    fn repeated_reference_is_fetched_once() {
        let mut fx = fixture(Scripted::serving(b"x", 1));
        let doc = "include 'a.php';\nrequire 'a.php';\n";
        let summary = fx.scanner.scan_text(doc, &mut NoopObserver);
        assert_eq!(summary.saved, 1);
        assert_eq!(summary.already_existed, 1);
        let tally = fx.scanner.finish();
        assert_eq!(tally.requests_sent, 1);
        assert_eq!(tally.already_existed, 1);
    }

    #[test]
    fn failures_do_not_stop_the_scan() {
        let mut fx = fixture(Scripted::new(vec![
            Ok((404, Vec::new(), None)),
            Ok((200, b"ok".to_vec(), Some(2))),
        ]));
        let doc = "include 'missing.php';\ninclude 'dir/';\ninclude 'found.php';\n";
        let summary = fx.scanner.scan_text(doc, &mut NoopObserver);
        assert_eq!(
            summary,
            ScanSummary {
                matches: 3,
                unparsed: 1,
                saved: 1,
                already_existed: 0,
                failed: 1,
            }
        );
        assert!(fx.dir.path().join("found.php").is_file());
        assert!(!fx.dir.path().join("missing.php").exists());
        let bad = fs::read_to_string(fx.dir.path().join("bad_requests.txt")).unwrap();
        assert!(bad.contains("missing.php"));
    }

    #[test]
    fn document_without_matches() {
        let mut fx = fixture(Scripted::always_refused());
        let summary = fx.scanner.scan_text("<?php echo 'hi';\n", &mut NoopObserver);
        assert_eq!(summary.matches, 0);
        assert_eq!(fx.scanner.tally().documents, 1);
    }

    #[test]
    fn scan_file_reads_non_utf8() {
        let mut fx = fixture(Scripted::serving(b"x", 1));
        let src = fx.dir.path().join("index.php");
        let mut bytes = b"\xff\xfe include 'lib.php';\n".to_vec();
        bytes.extend_from_slice(b"\x80 garbage\n");
        fs::write(&src, bytes).unwrap();
        let summary = fx.scanner.scan_file(&src, &mut NoopObserver).unwrap();
        assert_eq!(summary.saved, 1);
        assert!(fx.dir.path().join("lib.php").is_file());
    }

    #[test]
    fn empty_keyword_list_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(Scripted::always_refused(), RetryPolicy::immediate(1), None);
        let materializer = Materializer::new(dir.path(), fetcher).unwrap();
        let res = Scanner::new(
            vec![String::new()],
            PathExtractor::without_journal(ExtractOptions::default()),
            materializer,
            BaseUrl::parse("example.com").unwrap(),
        );
        assert!(matches!(res, Err(ConfigError::NoKeywords)));
    }
}
