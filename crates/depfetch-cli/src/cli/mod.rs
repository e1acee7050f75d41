//! CLI for depfetch.

mod commands;
pub mod exit;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use depfetch_core::config::{self, DepfetchConfig};
use depfetch_core::extract::QuotePriority;

use commands::{run_completions, run_crawl, run_extract, run_fetch, run_man};
use exit::RunStatus;

/// Top-level CLI for depfetch.
#[derive(Debug, Parser)]
#[command(name = "depfetch", version)]
#[command(
    about = "depfetch: rebuild a server's source tree by following include/require references",
    long_about = None
)]
pub struct Cli {
    /// Log to stderr instead of the log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.config/depfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options that shape reference extraction.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Comma-separated keywords (default from config: include,require).
    #[arg(short = 'w', long = "words", value_name = "LIST")]
    pub words: Option<String>,

    /// Prefer double-quoted literals over single-quoted ones.
    #[arg(long)]
    pub double_quote_first: bool,

    /// Do not force a leading "/" on extracted paths.
    #[arg(long)]
    pub no_leading_slash: bool,
}

impl ExtractArgs {
    pub fn apply(&self, cfg: &mut DepfetchConfig) {
        if let Some(words) = &self.words {
            cfg.keywords = config::parse_keywords(words);
        }
        if self.double_quote_first {
            cfg.extract.quote_priority = QuotePriority::DoubleFirst;
        }
        if self.no_leading_slash {
            cfg.extract.leading_slash = false;
        }
    }
}

/// Options shared by the commands that talk to a server.
#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Server address or URL prefix (http:// is added when missing).
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: String,

    /// Root of the local mirror; journals are written here too.
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Keep downloads whose size disagrees with Content-Length.
    #[arg(long)]
    pub no_verify_length: bool,

    #[command(flatten)]
    pub extract: ExtractArgs,
}

impl ScanArgs {
    pub fn apply(&self, cfg: &mut DepfetchConfig) {
        self.extract.apply(cfg);
        if self.no_verify_length {
            cfg.http.verify_length = false;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan one file and download every file it references.
    Fetch {
        /// Source file to scan.
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Scan the output tree repeatedly, following references in downloaded files.
    Crawl {
        /// Number of passes over the output tree.
        #[arg(short = 'r', long = "recursive", value_name = "N")]
        iterations: u32,

        /// Optional file scanned before the first pass.
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show matched lines and extracted paths without downloading anything.
    Extract {
        /// Source file to scan.
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl Cli {
    pub fn run(self) -> Result<RunStatus> {
        let Cli {
            config: config_path,
            command,
            ..
        } = self;

        match command {
            CliCommand::Fetch { file, scan } => {
                let mut cfg = load_config(config_path.as_deref())?;
                scan.apply(&mut cfg);
                run_fetch(&cfg, &scan, &file)
            }
            CliCommand::Crawl {
                iterations,
                file,
                scan,
            } => {
                let mut cfg = load_config(config_path.as_deref())?;
                scan.apply(&mut cfg);
                run_crawl(&cfg, &scan, iterations, file.as_deref())
            }
            CliCommand::Extract { file, extract } => {
                let mut cfg = load_config(config_path.as_deref())?;
                extract.apply(&mut cfg);
                run_extract(&cfg, &file, &mut std::io::stdout().lock())
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DepfetchConfig> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
