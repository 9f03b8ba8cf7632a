//! # JUnit Merge CLI
//!
//! This is the binary entry point for the `junit-merge` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the merge through the `junit_merge` library.
//! - Translating failures into a one-line message and exit code 1.
//!
//! Usage errors are condensed to one line and exit with 1; `--help` and
//! `--version` exit with 0.

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if error.use_stderr() => {
            eprintln!("{}", cli::usage_message(&error));
            return ExitCode::FAILURE;
        }
        Err(error) => {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
    };

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}
