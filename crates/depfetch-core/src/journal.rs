//! Append-only journals kept next to the reconstructed tree.
//!
//! Each event opens the file in append mode, writes one full line and closes
//! it again, so entries from earlier runs are never overwritten.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::extract::UnparsedEntry;

#[derive(Debug, Clone)]
struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    fn append_line(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write per entry keeps lines whole.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
    }
}

/// Journal of lines that could not be reduced to a path:
/// `<reason>\t<raw line>`.
#[derive(Debug, Clone)]
pub struct RejectionLog(AppendLog);

impl RejectionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(AppendLog { path: path.into() })
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }

    pub fn record(&self, entry: &UnparsedEntry) -> io::Result<()> {
        let line = entry.line.replace(['\r', '\n'], " ");
        self.0.append_line(&format!("{}\t{}", entry.reason.tag(), line))
    }
}

/// One failed request. Serialized as a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadRequest<'a> {
    /// Line the path was extracted from.
    pub reference: &'a str,
    pub url: &'a str,
    /// Intended local path, relative to the output root.
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Journal of failed fetches (bad status, exhausted retries, truncation).
#[derive(Debug, Clone)]
pub struct BadRequestLog(AppendLog);

impl BadRequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(AppendLog { path: path.into() })
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }

    pub fn record(&self, entry: &BadRequest<'_>) -> io::Result<()> {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        self.0.append_line(&line)
    }
}
