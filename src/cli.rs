//! CLI argument parsing and dispatch

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use junit_merge::options::{AppendTarget, MergeOptions};
use junit_merge::walk;

/// Merge JUnit XML test reports into a target report
#[derive(Parser, Debug)]
#[command(name = "junit-merge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source reports (files or directories) followed by the target
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    paths: Vec<PathBuf>,

    /// Only update test cases and files that already exist in the target
    #[arg(long, env = "JUNIT_MERGE_UPDATE_ONLY")]
    update_only: bool,

    /// Suite that receives new test cases (first, matching)
    #[arg(
        long,
        value_name = "SUITE",
        env = "JUNIT_MERGE_APPEND_TO",
        default_value = "first"
    )]
    append_to: AppendTarget,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        env = "JUNIT_MERGE_LOG",
        default_value = "warn"
    )]
    log_level: String,
}

impl Cli {
    /// Execute the merge described by the command line
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;

        // clap requires at least one path.
        let (target, sources) = self
            .paths
            .split_last()
            .context("No target path given")?;
        let options = MergeOptions {
            update_only: self.update_only,
            append_to: self.append_to,
        };

        walk::run(sources, target, &options)
            .with_context(|| format!("Failed to merge into {}", target.display()))?;
        Ok(())
    }
}

/// Condense a clap usage error to a single line.
///
/// The message lines before the `Usage:` block and the `--help` hint are
/// joined with spaces.
pub fn usage_message(error: &clap::Error) -> String {
    error
        .to_string()
        .lines()
        .map(str::trim)
        .take_while(|line| {
            !line.starts_with("Usage:") && !line.starts_with("For more information")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_logging(level: &str) -> Result<()> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", level))?;
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
    Ok(())
}
