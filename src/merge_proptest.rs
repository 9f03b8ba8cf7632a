//! Property-based tests for escaping and merging.
//!
//! These tests use proptest to generate random identities and random merges
//! and check that matching is exact and suite counters stay consistent.

#[cfg(test)]
mod proptest_tests {
    use std::path::Path;

    use crate::escape::escape;
    use crate::merge::{merge_text, MergeOutcome};
    use crate::options::MergeOptions;
    use crate::query::Selector;
    use crate::report::{Counter, Outcome, Reports};
    use proptest::prelude::*;

    fn outcome_strategy() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Passed),
            Just(Outcome::Failure),
            Just(Outcome::Error),
            Just(Outcome::Skipped),
        ]
    }

    fn marker(outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Passed => "",
            Outcome::Failure => "<failure/>",
            Outcome::Error => "<error/>",
            Outcome::Skipped => "<skipped/>",
        }
    }

    /// Escape `value` for a double-quoted attribute, keeping whitespace exact.
    fn attribute_value(value: &str) -> String {
        let mut escaped = String::new();
        for c in value.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '"' => escaped.push_str("&quot;"),
                '\t' => escaped.push_str("&#9;"),
                '\n' => escaped.push_str("&#10;"),
                '\r' => escaped.push_str("&#13;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Twelve test names, possibly repeated, with quotes, markup characters
    /// and whitespace.
    fn names_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-z \t\n\r'\"&<>]{0,6}", 12)
    }

    fn plain_names() -> Vec<String> {
        (0..12).map(|index| format!("t{}", index)).collect()
    }

    /// A report with exact counters for `cases` of `(name index, outcome)`.
    fn report(names: &[String], cases: &[(usize, Outcome)]) -> String {
        let count = |wanted: Outcome| cases.iter().filter(|(_, o)| *o == wanted).count();
        let mut xml = format!(
            r#"<testsuites tests="{0}" failures="{1}" errors="{2}" skipped="{3}"><testsuite name="s" tests="{0}" failures="{1}" errors="{2}" skipped="{3}">"#,
            cases.len(),
            count(Outcome::Failure),
            count(Outcome::Error),
            count(Outcome::Skipped)
        );
        for (index, outcome) in cases {
            xml.push_str(&format!(
                r#"<testcase classname="c" name="{}">{}</testcase>"#,
                attribute_value(&names[*index]),
                marker(*outcome)
            ));
        }
        xml.push_str("</testsuite></testsuites>");
        xml
    }

    /// Check every summary element's counters against a full re-count.
    fn assert_counters_match_recount(xml: &str) -> Result<(), TestCaseError> {
        let mut reports = Reports::new();
        let doc = reports.parse(Path::new("merged.xml"), xml).unwrap();
        let summaries: Vec<_> = reports
            .xot()
            .descendants(doc)
            .filter(|&node| reports.kind(node).is_summary())
            .collect();
        for summary in summaries {
            let outcomes: Vec<Outcome> = reports
                .test_cases(summary)
                .into_iter()
                .map(|node| reports.outcome(node))
                .collect();
            let count = |wanted: Outcome| outcomes.iter().filter(|o| **o == wanted).count() as i64;
            prop_assert_eq!(reports.counter(summary, Counter::Tests), Some(outcomes.len() as i64));
            prop_assert_eq!(reports.counter(summary, Counter::Failures), Some(count(Outcome::Failure)));
            prop_assert_eq!(reports.counter(summary, Counter::Errors), Some(count(Outcome::Error)));
            prop_assert_eq!(reports.counter(summary, Counter::Skipped), Some(count(Outcome::Skipped)));
        }
        Ok(())
    }

    // ============================================================================
    // escape property tests
    // ============================================================================

    proptest! {
        /// Property: the escaped literal parses back to exactly the input
        #[test]
        fn escape_round_trips_through_query(value in ".*") {
            let query = format!("testcase[@name={}]", escape(&value));
            let selector = Selector::parse(&query).unwrap();
            prop_assert_eq!(&selector.predicates[0].value, &value);
        }

        /// Property: quote-heavy values round-trip as well
        #[test]
        fn escape_round_trips_quote_heavy_values(value in "['\"a ]{0,12}") {
            let query = format!("testcase[@name={}]", escape(&value));
            let selector = Selector::parse(&query).unwrap();
            prop_assert_eq!(&selector.predicates[0].value, &value);
        }
    }

    // ============================================================================
    // merge property tests
    // ============================================================================

    proptest! {
        /// Property: counters equal a full re-count after any merge, and
        /// merging the same source again appends nothing
        #[test]
        fn merge_keeps_counters_consistent(
            names in names_strategy(),
            target in proptest::collection::vec(outcome_strategy(), 0..8),
            source in proptest::collection::vec((0usize..12, outcome_strategy()), 1..10),
            update_only in any::<bool>(),
        ) {
            let target_cases: Vec<(usize, Outcome)> = target.into_iter().enumerate().collect();
            let options = MergeOptions { update_only, ..MergeOptions::default() };
            let source = report(&names, &source);

            let outcome = merge_text(&source, &report(&names, &target_cases), &options).unwrap();
            let MergeOutcome::Merged { xml, .. } = outcome else {
                return Err(TestCaseError::fail("expected a merge"));
            };
            assert_counters_match_recount(&xml)?;

            let outcome = merge_text(&source, &xml, &options).unwrap();
            let MergeOutcome::Merged { xml, stats } = outcome else {
                return Err(TestCaseError::fail("expected a second merge"));
            };
            prop_assert_eq!(stats.appended, 0);
            assert_counters_match_recount(&xml)?;
        }

        /// Property: the last source entry for an identity wins
        #[test]
        fn merge_last_source_entry_wins(
            target in proptest::collection::vec(outcome_strategy(), 1..6),
            source in proptest::collection::vec((0usize..6, outcome_strategy()), 1..10),
        ) {
            let names = plain_names();
            let target_cases: Vec<(usize, Outcome)> = target.into_iter().enumerate().collect();
            let outcome = merge_text(
                &report(&names, &source),
                &report(&names, &target_cases),
                &MergeOptions::default(),
            )
            .unwrap();
            let MergeOutcome::Merged { xml, .. } = outcome else {
                return Err(TestCaseError::fail("expected a merge"));
            };

            let mut reports = Reports::new();
            let doc = reports.parse(Path::new("merged.xml"), &xml).unwrap();
            for (index, _) in &source {
                let last = source.iter().rev().find(|(i, _)| i == index).map(|(_, o)| *o);
                let name = format!("t{}", index);
                let found: Vec<Outcome> = reports
                    .test_cases(doc)
                    .into_iter()
                    .filter(|&node| reports.identity(node).name == name)
                    .map(|node| reports.outcome(node))
                    .collect();
                prop_assert_eq!(found, vec![last.unwrap()]);
            }
        }
    }
}
