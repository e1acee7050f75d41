//! Maps canonical paths onto a local tree under a fixed output root.
//!
//! Directories are created one segment at a time (existing ones are reused),
//! and a fetch is issued only when the target file is missing. Every path is
//! joined onto the absolute root; the process working directory is never
//! changed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::base_url::BaseUrl;
use crate::error::ConfigError;
use crate::extract::CanonicalPath;
use crate::fetch::{CurlTransport, FailureReason, FetchOutcome, FetchRequest, Fetcher, Transport};
use crate::observer::ScanObserver;

pub struct Materializer<T: Transport = CurlTransport> {
    root: PathBuf,
    fetcher: Fetcher<T>,
}

impl<T: Transport> Materializer<T> {
    /// `root` is created if missing and made absolute.
    pub fn new(root: &Path, fetcher: Fetcher<T>) -> Result<Self, ConfigError> {
        let dir_err = |source| ConfigError::OutputDir {
            path: root.to_path_buf(),
            source,
        };
        fs::create_dir_all(root).map_err(dir_err)?;
        let root = root.canonicalize().map_err(dir_err)?;
        Ok(Self { root, fetcher })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Local directory for `path`, relative to the root.
    pub fn local_dir(path: &CanonicalPath) -> PathBuf {
        local_dirs(path).iter().collect()
    }

    /// Absolute local file for `path`.
    pub fn local_path(&self, path: &CanonicalPath) -> PathBuf {
        self.root.join(Self::local_dir(path)).join(path.file_name())
    }

    /// Ensures the directory chain exists, then fetches `path` from `base`
    /// unless the file is already present.
    pub fn materialize(
        &mut self,
        reference: &str,
        path: &CanonicalPath,
        base: &BaseUrl,
        observer: &mut dyn ScanObserver,
    ) -> FetchOutcome {
        let url = base.join(path);
        let mut dir = self.root.clone();
        for segment in local_dirs(path) {
            dir.push(segment);
            if dir.is_dir() {
                continue;
            }
            if let Err(e) = fs::create_dir(&dir) {
                tracing::warn!(dir = %dir.display(), "cannot create directory: {}", e);
                let reason = FailureReason::Storage(e.to_string());
                let req = FetchRequest {
                    reference,
                    url: &url,
                    path,
                    dest: &dir,
                };
                self.fetcher.journal_failure(&req, &reason);
                return FetchOutcome::Failed {
                    path: path.clone(),
                    reason,
                };
            }
            tracing::debug!(dir = %dir.display(), "created directory");
        }

        let dest = dir.join(path.file_name());
        if dest.is_file() {
            tracing::info!(path = %path, "file already exists, request not sent");
            return FetchOutcome::AlreadyExists { path: path.clone() };
        }

        let req = FetchRequest {
            reference,
            url: &url,
            path,
            dest: &dest,
        };
        self.fetcher.fetch(&req, observer)
    }
}

/// Directory segments with "." dropped and ".." clamped at the root.
fn local_dirs(path: &CanonicalPath) -> Vec<&str> {
    let mut stack = Vec::new();
    for segment in path.dir_segments() {
        match segment {
            "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }
    stack
}
