//! `depfetch completions` and `depfetch man`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::exit::RunStatus;
use crate::cli::Cli;

pub fn run_completions(shell: Shell) -> Result<RunStatus> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "depfetch", &mut std::io::stdout());
    Ok(RunStatus::Success)
}

pub fn run_man() -> Result<RunStatus> {
    let man = clap_mangen::Man::new(Cli::command());
    man.render(&mut std::io::stdout())?;
    Ok(RunStatus::Success)
}
