//! `depfetch fetch` – scan one document and mirror what it references.

use std::path::Path;

use anyhow::{Context, Result};
use depfetch_core::config::DepfetchConfig;
use depfetch_core::{BaseUrl, Scanner};

use super::require_input;
use crate::cli::exit::RunStatus;
use crate::cli::report::{print_tally, ConsoleReporter};
use crate::cli::ScanArgs;

pub fn run_fetch(cfg: &DepfetchConfig, args: &ScanArgs, file: &Path) -> Result<RunStatus> {
    let base = BaseUrl::parse(&args.url)?;
    require_input(file)?;
    let mut scanner = Scanner::from_config(cfg, base, &args.output)?;
    tracing::info!(
        file = %file.display(),
        root = %scanner.root().display(),
        "fetch started"
    );

    let mut reporter = ConsoleReporter::stdout();
    let summary = scanner
        .scan_file(file, &mut reporter)
        .with_context(|| format!("failed to read {}", file.display()))?;

    if summary.matches == 0 {
        println!(
            "no lines containing {} in {}",
            scanner.keywords().join(", "),
            file.display()
        );
    }
    let tally = scanner.finish();
    print_tally(&mut std::io::stdout().lock(), &tally)?;

    Ok(if summary.matches == 0 {
        RunStatus::NoMatches
    } else {
        RunStatus::Success
    })
}
