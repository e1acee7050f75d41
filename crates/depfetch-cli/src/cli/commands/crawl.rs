//! `depfetch crawl` – re-scan the mirror until no new files turn up.

use std::path::Path;

use anyhow::Result;
use depfetch_core::config::DepfetchConfig;
use depfetch_core::crawl::Crawler;
use depfetch_core::{BaseUrl, Scanner};

use super::require_input;
use crate::cli::exit::RunStatus;
use crate::cli::report::{print_tally, ConsoleReporter};
use crate::cli::ScanArgs;

pub fn run_crawl(
    cfg: &DepfetchConfig,
    args: &ScanArgs,
    iterations: u32,
    seed: Option<&Path>,
) -> Result<RunStatus> {
    let base = BaseUrl::parse(&args.url)?;
    if let Some(seed) = seed {
        require_input(seed)?;
    }
    let mut scanner = Scanner::from_config(cfg, base, &args.output)?;
    let mut crawler = Crawler::from_config(cfg, scanner.root());

    let mut reporter = ConsoleReporter::stdout();
    let summary = crawler.run(&mut scanner, iterations, seed, &mut reporter);
    println!(
        "\n{} passes, {} files scanned, {} too large, {} unreadable",
        summary.iterations, summary.files_scanned, summary.files_skipped, summary.read_errors
    );

    let tally = scanner.finish();
    print_tally(&mut std::io::stdout().lock(), &tally)?;
    Ok(RunStatus::Success)
}
