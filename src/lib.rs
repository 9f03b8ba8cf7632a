//! # JUnit Report Merging
//!
//! This library merges JUnit-style XML test reports into a baseline report.
//! It is used by the `junit-merge` command-line tool, typically in CI
//! pipelines that re-run a subset of tests (for example flaky-test retries)
//! and need to fold the new results back into the full report.
//!
//! ## Quick Example
//!
//! ```
//! use junit_merge::merge::{merge_text, MergeOutcome};
//! use junit_merge::options::MergeOptions;
//!
//! let target = r#"<testsuite tests="1" failures="1">
//!   <testcase classname="a" name="flaky"><failure/></testcase>
//! </testsuite>"#;
//! let source = r#"<testsuite><testcase classname="a" name="flaky"/></testsuite>"#;
//!
//! let outcome = merge_text(source, target, &MergeOptions::default()).unwrap();
//! let MergeOutcome::Merged { xml, stats } = outcome else {
//!     panic!("expected a merge");
//! };
//! assert_eq!(stats.replaced, 1);
//! assert!(xml.contains(r#"failures="0""#));
//! ```
//!
//! ## Core Concepts
//!
//! - **Reports (`report`)**: Parsed documents in a shared XML arena, with
//!   elements classified as suites, suite collections and test cases.
//! - **Escaping and queries (`escape`, `query`)**: Exact attribute-equality
//!   queries for arbitrary test identities.
//! - **Summary diffs (`summary`)**: Signed counter deltas applied to every
//!   enclosing suite so totals stay exact without re-counting.
//! - **Merging (`merge`)**: The per-file algorithm.
//! - **Walking (`walk`)**: Pairing source files with target files and
//!   running the merge over whole directory trees.

pub mod error;
pub mod escape;
pub mod merge;
pub mod options;
pub mod query;
pub mod report;
pub mod summary;
pub mod walk;

#[cfg(test)]
mod merge_proptest;
