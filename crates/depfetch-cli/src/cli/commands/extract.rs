//! `depfetch extract` – dry run: matched lines and their canonical paths.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use depfetch_core::config::DepfetchConfig;
use depfetch_core::{find_matches, usable_keywords, PathExtractor};

use super::require_input;
use crate::cli::exit::RunStatus;

/// Never touches the network or the journals.
pub fn run_extract(cfg: &DepfetchConfig, file: &Path, out: &mut impl Write) -> Result<RunStatus> {
    require_input(file)?;
    let keywords = usable_keywords(cfg.keywords.iter().map(String::as_str))?;
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let extractor = PathExtractor::without_journal(cfg.extract.options());
    let matches = find_matches(&text, &keywords);
    for line in &matches {
        match extractor.extract(&line.content) {
            Ok(path) => writeln!(out, "{}\t{}", line.number, path)?,
            Err(entry) => writeln!(
                out,
                "{}\t!{}\t{}",
                line.number,
                entry.reason.tag(),
                line.content.trim()
            )?,
        }
    }
    writeln!(out, "{} matching lines", matches.len())?;
    Ok(RunStatus::Success)
}
