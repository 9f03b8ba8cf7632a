//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_report("source.xml", &[("a.a", Pass)])
//!         .with_report("target.xml", &[("a.a", Fail)]);
//!     fixture.command().arg("source.xml").arg("target.xml").assert().success();
//! }
//! ```

// Not every test binary uses every helper.
#![allow(dead_code)]

use assert_fs::prelude::*;
use std::path::Path;

use junit_merge::report::{Outcome, Reports};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::TestResult::{Error, Fail, Pass, Skip};
    pub use super::{parse_results, TestFixture};
}

/// The outcome written for a test case in a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Error,
    Skip,
}

impl From<Outcome> for TestResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Passed => TestResult::Pass,
            Outcome::Failure => TestResult::Fail,
            Outcome::Error => TestResult::Error,
            Outcome::Skipped => TestResult::Skip,
        }
    }
}

/// Render a report for `tests`, given as `("classname.name", result)`.
///
/// The suite carries exact `tests`, `failures`, `errors` and `skipped`
/// counters.
pub fn report(tests: &[(&str, TestResult)]) -> String {
    let count = |wanted: TestResult| tests.iter().filter(|(_, r)| *r == wanted).count();
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"suite\" tests=\"{}\" failures=\"{}\" errors=\"{}\" skipped=\"{}\">\n",
        tests.len(),
        count(TestResult::Fail),
        count(TestResult::Error),
        count(TestResult::Skip)
    );
    for (id, result) in tests {
        let (classname, name) = id.rsplit_once('.').unwrap_or(("", *id));
        let marker = match result {
            TestResult::Pass => "",
            TestResult::Fail => "<failure message=\"failed\"/>",
            TestResult::Error => "<error message=\"errored\"/>",
            TestResult::Skip => "<skipped/>",
        };
        xml.push_str(&format!(
            "  <testcase classname=\"{}\" name=\"{}\">{}</testcase>\n",
            classname, name, marker
        ));
    }
    xml.push_str("</testsuite>\n");
    xml
}

/// Read a report back as `("classname.name", result)` in document order.
pub fn parse_results(path: &Path) -> Vec<(String, TestResult)> {
    let text = std::fs::read_to_string(path).expect("Failed to read report");
    let mut reports = Reports::new();
    let doc = reports.parse(path, &text).expect("Failed to parse report");
    reports
        .test_cases(doc)
        .into_iter()
        .map(|node| (reports.identity(node).to_string(), reports.outcome(node).into()))
        .collect()
}

/// A temporary directory holding source and target reports.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a generated report at `path`.
    pub fn with_report(self, path: &str, tests: &[(&str, TestResult)]) -> Self {
        self.with_file(path, &report(tests))
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Results of the report at `path`.
    pub fn results(&self, path: &str) -> Vec<(String, TestResult)> {
        parse_results(&self.path().join(path))
    }

    /// Raw content of the file at `path`.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("junit-merge");
        cmd.current_dir(self.path());
        cmd.env_remove("JUNIT_MERGE_UPDATE_ONLY")
            .env_remove("JUNIT_MERGE_APPEND_TO")
            .env_remove("JUNIT_MERGE_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
