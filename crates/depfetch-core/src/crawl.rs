//! Repeated re-scanning of the output tree.
//!
//! Files saved in one iteration become inputs of the next, so include chains
//! are followed a few levels deep. Each walk is collected and sorted before
//! any file is scanned; files written during an iteration are picked up by
//! the following one.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::config::DepfetchConfig;
use crate::fetch::{Transport, TEMP_SUFFIX};
use crate::observer::ScanObserver;
use crate::scan::Scanner;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Iterations actually walked (may stop early).
    pub iterations: u32,
    pub files_scanned: u64,
    pub files_skipped: u64,
    pub read_errors: u64,
}

pub struct Crawler {
    max_file_bytes: u64,
    excluded: HashSet<PathBuf>,
    seen: HashMap<PathBuf, SystemTime>,
}

impl Crawler {
    pub fn new(max_file_bytes: u64) -> Self {
        Self {
            max_file_bytes,
            excluded: HashSet::new(),
            seen: HashMap::new(),
        }
    }

    /// Crawler over `root` that never scans its own journals or the running
    /// executable.
    pub fn from_config(cfg: &DepfetchConfig, root: &Path) -> Self {
        let mut crawler = Self::new(cfg.crawl.max_file_bytes)
            .exclude(root.join(&cfg.rejection_log))
            .exclude(root.join(&cfg.bad_request_log));
        if let Ok(exe) = std::env::current_exe() {
            crawler = crawler.exclude(exe);
        }
        crawler
    }

    /// Never scan `path`.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = path.canonicalize().unwrap_or(path);
        self.excluded.insert(path);
        self
    }

    /// Scans `seed` (if any), then walks the scanner's root up to
    /// `iterations` times.
    pub fn run<T: Transport>(
        &mut self,
        scanner: &mut Scanner<T>,
        iterations: u32,
        seed: Option<&Path>,
        observer: &mut dyn ScanObserver,
    ) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        if let Some(seed) = seed {
            let key = seed.canonicalize().unwrap_or_else(|_| seed.to_path_buf());
            self.scan_one(scanner, &key, &mut summary, observer);
        }

        let root = scanner.root().to_path_buf();
        for iteration in 1..=iterations {
            summary.iterations = iteration;
            let pending = self.pending_files(&root, &mut summary);
            tracing::info!(iteration, pending = pending.len(), "crawl iteration");
            if pending.is_empty() {
                break;
            }
            for path in pending {
                self.scan_one(scanner, &path, &mut summary, observer);
            }
        }
        summary
    }

    fn pending_files(&self, root: &Path, summary: &mut CrawlSummary) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("walk error: {}", e);
                    summary.read_errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if self.excluded.contains(path) || is_partial(path) {
                continue;
            }
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(file = %path.display(), "stat failed: {}", e);
                    summary.read_errors += 1;
                    continue;
                }
            };
            if meta.len() >= self.max_file_bytes {
                tracing::debug!(file = %path.display(), size = meta.len(), "too large, skipped");
                summary.files_skipped += 1;
                continue;
            }
            let unchanged = match (meta.modified(), self.seen.get(path)) {
                (Ok(mtime), Some(seen)) => mtime == *seen,
                _ => false,
            };
            if !unchanged {
                out.push(path.to_path_buf());
            }
        }
        out
    }

    fn scan_one<T: Transport>(
        &mut self,
        scanner: &mut Scanner<T>,
        path: &Path,
        summary: &mut CrawlSummary,
        observer: &mut dyn ScanObserver,
    ) {
        let mtime = fs::metadata(path).and_then(|m| m.modified());
        match scanner.scan_file(path, observer) {
            Ok(_) => summary.files_scanned += 1,
            Err(e) => {
                tracing::warn!(file = %path.display(), "cannot read: {}", e);
                summary.read_errors += 1;
            }
        }
        if let Ok(mtime) = mtime {
            self.seen.insert(path.to_path_buf(), mtime);
        }
    }
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
}
