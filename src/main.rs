use std::process::ExitCode;

use autoi18n::cli::{Arguments, ExitStatus, run_cli};
use clap::Parser;
use colored::Colorize;

fn main() -> ExitCode {
    let args = Arguments::parse();

    match run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
