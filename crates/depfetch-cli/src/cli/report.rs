//! Console output: per-line progress while scanning and the final tally.

use std::io::{self, Write};
use std::path::Path;

use depfetch_core::{FetchOutcome, RunTally, ScanObserver, SourceLine, UnparsedEntry};

const BAR_WIDTH: usize = 40;

/// Prints pipeline events as they happen. Write errors on the console are
/// ignored.
pub struct ConsoleReporter<W: Write> {
    out: W,
    bar_drawn: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_drawn: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn end_bar(&mut self) {
        if self.bar_drawn {
            let _ = writeln!(self.out);
            self.bar_drawn = false;
        }
    }
}

impl<W: Write> ScanObserver for ConsoleReporter<W> {
    fn document(&mut self, path: &Path, matches: usize) {
        let _ = writeln!(self.out, "scanning {} ({} matching lines)", path.display(), matches);
    }

    fn matched(&mut self, line: &SourceLine) {
        let _ = writeln!(self.out, "[line {}] {}", line.number, line.content.trim());
    }

    fn rejected(&mut self, entry: &UnparsedEntry) {
        let _ = writeln!(self.out, "    not parsed: {}", entry.reason);
    }

    fn fetch_started(&mut self, url: &str) {
        let _ = writeln!(self.out, "    GET {}", url);
    }

    fn progress(&mut self, downloaded: u64, total: Option<u64>) {
        let line = match total {
            Some(total) => bar(downloaded, total, BAR_WIDTH),
            None => format!("{} bytes", downloaded),
        };
        let _ = write!(self.out, "\r    {}", line);
        let _ = self.out.flush();
        self.bar_drawn = true;
    }

    fn outcome(&mut self, outcome: &FetchOutcome) {
        self.end_bar();
        let _ = match outcome {
            FetchOutcome::Saved { path, bytes } => {
                writeln!(self.out, "    saved {} ({} bytes)", path, bytes)
            }
            FetchOutcome::AlreadyExists { path } => {
                writeln!(self.out, "    {} already exists, request not sent", path)
            }
            FetchOutcome::Failed { path, reason } => {
                writeln!(self.out, "    {} not downloaded: {}", path, reason)
            }
        };
    }
}

/// `[=====     ]  50%` style bar. A zero total counts as complete.
pub fn bar(done: u64, total: u64, width: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (done as f64 / total as f64).min(1.0)
    };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "=".repeat(filled),
        " ".repeat(width - filled),
        (ratio * 100.0).round() as u32
    )
}

pub fn print_tally(out: &mut impl Write, tally: &RunTally) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "requests sent:   {}", tally.requests_sent)?;
    writeln!(out, "not parsed:      {}", tally.unparsed)?;
    writeln!(out, "already existed: {}", tally.already_existed)?;
    writeln!(out, "saved:           {} ({} bytes)", tally.saved, tally.bytes_saved)?;
    writeln!(out, "failed:          {}", tally.failed)?;
    writeln!(out, "elapsed:         {:.2}s", tally.elapsed.as_secs_f64())?;
    Ok(())
}
