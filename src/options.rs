//! Merge configuration shared by the tree walker and the file merger.

use std::fmt;
use std::str::FromStr;

/// Where a source test case with no counterpart in the target is appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppendTarget {
    /// The first `testsuite` element of the target document.
    #[default]
    FirstSuite,
    /// The first target `testsuite` whose `name` equals the name of the suite
    /// enclosing the source test case, falling back to the first suite.
    MatchingSuite,
}

impl FromStr for AppendTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(AppendTarget::FirstSuite),
            "matching" => Ok(AppendTarget::MatchingSuite),
            _ => Err(format!("Unknown append target '{}'. Use: first or matching", s)),
        }
    }
}

impl fmt::Display for AppendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendTarget::FirstSuite => f.write_str("first"),
            AppendTarget::MatchingSuite => f.write_str("matching"),
        }
    }
}

/// Options controlling a merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Only update test cases already present in the target; never add new
    /// test cases or new files.
    pub update_only: bool,
    /// Where new test cases go.
    pub append_to: AppendTarget,
}

impl MergeOptions {
    /// Options for update-only mode with the default append target.
    pub fn update_only() -> Self {
        Self {
            update_only: true,
            ..Self::default()
        }
    }
}
