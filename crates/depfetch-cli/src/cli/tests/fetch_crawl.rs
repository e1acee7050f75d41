//! Tests for fetch and crawl subcommands.

use std::path::Path;

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use depfetch_core::config::DepfetchConfig;
use depfetch_core::extract::QuotePriority;

#[test]
fn cli_parse_fetch_defaults() {
    match parse(&["depfetch", "fetch", "-u", "example.com", "-f", "index.php"]) {
        CliCommand::Fetch { file, scan } => {
            assert_eq!(file, Path::new("index.php"));
            assert_eq!(scan.url, "example.com");
            assert_eq!(scan.output, Path::new("."));
            assert!(scan.extract.words.is_none());
            assert!(!scan.extract.double_quote_first);
            assert!(!scan.extract.no_leading_slash);
            assert!(!scan.no_verify_length);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_overrides_apply_to_config() {
    match parse(&[
        "depfetch",
        "fetch",
        "--url",
        "http://10.0.0.5/dl.php?f=",
        "--file",
        "page.php",
        "-w",
        "include_once,require",
        "-o",
        "/tmp/mirror",
        "--double-quote-first",
        "--no-leading-slash",
        "--no-verify-length",
    ]) {
        CliCommand::Fetch { scan, .. } => {
            assert_eq!(scan.output, Path::new("/tmp/mirror"));
            let mut cfg = DepfetchConfig::default();
            scan.apply(&mut cfg);
            assert_eq!(cfg.keywords, vec!["include_once", "require"]);
            assert_eq!(cfg.extract.quote_priority, QuotePriority::DoubleFirst);
            assert!(!cfg.extract.leading_slash);
            assert!(!cfg.http.verify_length);
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_requires_url_and_file() {
    assert!(Cli::try_parse_from(["depfetch", "fetch", "-f", "index.php"]).is_err());
    assert!(Cli::try_parse_from(["depfetch", "fetch", "-u", "example.com"]).is_err());
}

#[test]
fn cli_parse_crawl() {
    match parse(&["depfetch", "crawl", "-u", "example.com", "-r", "3"]) {
        CliCommand::Crawl {
            iterations,
            file,
            scan,
        } => {
            assert_eq!(iterations, 3);
            assert!(file.is_none());
            assert_eq!(scan.url, "example.com");
        }
        _ => panic!("expected Crawl"),
    }
}

#[test]
fn cli_parse_crawl_with_seed() {
    match parse(&[
        "depfetch", "crawl", "-u", "example.com", "-r", "2", "-f", "seed.php",
    ]) {
        CliCommand::Crawl { file, .. } => {
            assert_eq!(file.as_deref(), Some(Path::new("seed.php")));
        }
        _ => panic!("expected Crawl with seed"),
    }
}

#[test]
fn cli_parse_crawl_rejects_negative_iterations() {
    assert!(Cli::try_parse_from(["depfetch", "crawl", "-u", "x", "-r", "-1"]).is_err());
}
