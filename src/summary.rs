//! Incremental maintenance of suite summary counters
//!
//! A [`SummaryDiff`] records the net effect of one merge decision on the
//! `tests`, `failures`, `errors` and `skipped` counters. Applying it to every
//! counter-bearing ancestor of the affected test case keeps those counters
//! exact without re-scanning the subtree.

use log::warn;
use xot::Node;

use crate::report::{Counter, Outcome, Reports};

/// Signed deltas for the four summary counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryDiff {
    pub tests: i64,
    pub failures: i64,
    pub errors: i64,
    pub skipped: i64,
}

impl SummaryDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for inserting (`sign = 1`) or removing (`sign = -1`) the test
    /// case `node`.
    pub fn add(&mut self, reports: &Reports, node: Node, sign: i64) {
        self.add_outcome(reports.outcome(node), sign);
    }

    /// Account for inserting or removing one test case with `outcome`.
    pub fn add_outcome(&mut self, outcome: Outcome, sign: i64) {
        self.tests += sign;
        match outcome {
            Outcome::Passed => {}
            Outcome::Failure => self.failures += sign,
            Outcome::Error => self.errors += sign,
            Outcome::Skipped => self.skipped += sign,
        }
    }

    pub fn delta(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Tests => self.tests,
            Counter::Failures => self.failures,
            Counter::Errors => self.errors,
            Counter::Skipped => self.skipped,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Add the deltas to the counters `suite` already reports.
    ///
    /// Absent counters stay absent. A counter that is present but not an
    /// integer, or that would overflow, is left untouched.
    pub fn apply_to(&self, reports: &mut Reports, suite: Node) {
        for counter in Counter::ALL {
            let delta = self.delta(counter);
            if delta == 0 {
                continue;
            }
            let Some(text) = reports.counter_text(suite, counter) else {
                continue;
            };
            let current = match text.trim().parse::<i64>() {
                Ok(current) => current,
                Err(_) => {
                    warn!(
                        "Leaving non-numeric '{}' counter '{}' unchanged",
                        counter.attribute(),
                        text
                    );
                    continue;
                }
            };
            match current.checked_add(delta) {
                Some(updated) => reports.set_counter(suite, counter, updated),
                None => warn!(
                    "Leaving out-of-range '{}' counter '{}' unchanged",
                    counter.attribute(),
                    current
                ),
            }
        }
    }
}
