//! Per-file merge of JUnit reports
//!
//! Every test case of the source report is matched against the target report
//! by its `(classname, name)` identity:
//!
//! - a match is replaced by the source test case;
//! - otherwise the source test case is appended to a target suite, unless
//!   running in update-only mode, in which case it is dropped.
//!
//! After each decision the net counter change is applied to every suite-level
//! ancestor of the test case's new position, so `tests`, `failures`, `errors`
//! and `skipped` stay exact.
//!
//! Two short-circuits run before any parsing: a blank target is left alone,
//! and a blank source overwrites the target verbatim.

use std::fs;
use std::path::Path;

use log::{debug, info};
use xot::Node;

use crate::error::{Error, Result};
use crate::options::{AppendTarget, MergeOptions};
use crate::query::Selector;
use crate::report::Reports;
use crate::summary::SummaryDiff;

/// Counts of the decisions taken while merging one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Target test cases replaced by a source test case.
    pub replaced: usize,
    /// Source test cases appended to the target.
    pub appended: usize,
    /// Source test cases dropped in update-only mode.
    pub skipped: usize,
}

/// What merging one source into one target produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target is blank and stays as it is.
    Unchanged,
    /// The source is blank and replaces the target verbatim.
    Copied,
    /// The merged target document.
    Merged { xml: String, stats: MergeStats },
}

/// Merge the report at `source` into the report at `target`, rewriting
/// `target` in place.
///
/// Invalid UTF-8 in either file is replaced with U+FFFD before parsing.
///
/// # Errors
///
/// Returns `Error::XmlParse` if a non-blank file is not well-formed XML,
/// `Error::NoSuite` if a test case must be appended but the target has no
/// suite, and I/O errors from reading or writing either file.
pub fn merge_file(source: &Path, target: &Path, options: &MergeOptions) -> Result<MergeOutcome> {
    let source_bytes = fs::read(source)?;
    let target_bytes = fs::read(target)?;
    let source_text = String::from_utf8_lossy(&source_bytes);
    let target_text = String::from_utf8_lossy(&target_bytes);

    let outcome = merge_reports(source, &source_text, target, &target_text, options)?;
    match &outcome {
        MergeOutcome::Unchanged => {
            info!("{}: target is empty, skipping", target.display());
        }
        MergeOutcome::Copied => {
            fs::write(target, &source_bytes)?;
            info!(
                "{}: source {} is empty, copied over target",
                target.display(),
                source.display()
            );
        }
        MergeOutcome::Merged { xml, stats } => {
            fs::write(target, xml)?;
            info!(
                "{}: merged {} ({} replaced, {} appended, {} skipped)",
                target.display(),
                source.display(),
                stats.replaced,
                stats.appended,
                stats.skipped
            );
        }
    }
    Ok(outcome)
}

/// Merge report text `source` into report text `target`.
///
/// This is the file-free form of [`merge_file`].
pub fn merge_text(source: &str, target: &str, options: &MergeOptions) -> Result<MergeOutcome> {
    merge_reports(
        Path::new("<source>"),
        source,
        Path::new("<target>"),
        target,
        options,
    )
}

fn merge_reports(
    source_path: &Path,
    source: &str,
    target_path: &Path,
    target: &str,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    if target.trim().is_empty() {
        return Ok(MergeOutcome::Unchanged);
    }
    if source.trim().is_empty() {
        return Ok(MergeOutcome::Copied);
    }

    let mut reports = Reports::new();
    let source_doc = reports.parse(source_path, source)?;
    let target_doc = reports.parse(target_path, target)?;

    let stats = merge_documents(&mut reports, source_doc, target_doc, target_path, options)?;

    let mut xml = reports.to_string(target_doc)?;
    if let Some(declaration) = xml_declaration(target) {
        xml = format!("{}\n{}", declaration, xml);
    }
    Ok(MergeOutcome::Merged { xml, stats })
}

/// Merge every test case of `source_doc` into `target_doc`.
///
/// Both documents must live in `reports`. Source test cases are moved, not
/// copied, into the target.
pub fn merge_documents(
    reports: &mut Reports,
    source_doc: Node,
    target_doc: Node,
    target_path: &Path,
    options: &MergeOptions,
) -> Result<MergeStats> {
    let mut stats = MergeStats::default();

    for node in reports.test_cases(source_doc) {
        let id = reports.identity(node);
        let selector = Selector::parse(&id.query())?;
        let mut diff = SummaryDiff::new();

        if let Some(original) = selector.find_first(reports.xot(), target_doc) {
            diff.add(reports, node, 1);
            diff.add(reports, original, -1);
            reports.replace(original, node)?;
            stats.replaced += 1;
            debug!("{}: replaced {}", target_path.display(), id);
        } else if options.update_only {
            stats.skipped += 1;
            debug!("{}: skipped new test case {}", target_path.display(), id);
            continue;
        } else {
            let suite = append_target(reports, node, target_doc, options.append_to).ok_or_else(
                || Error::NoSuite {
                    path: target_path.to_path_buf(),
                },
            )?;
            diff.add(reports, node, 1);
            reports.append(suite, node)?;
            stats.appended += 1;
            debug!("{}: appended {}", target_path.display(), id);
        }

        for ancestor in reports.summary_ancestors(node) {
            diff.apply_to(reports, ancestor);
        }
    }

    Ok(stats)
}

/// Pick the target suite a new source test case is appended to.
fn append_target(
    reports: &Reports,
    node: Node,
    target_doc: Node,
    append_to: AppendTarget,
) -> Option<Node> {
    let suites = reports.suites(target_doc);
    if append_to == AppendTarget::MatchingSuite {
        let source_suite = reports
            .enclosing_suite(node)
            .and_then(|suite| reports.name_of(suite));
        if let Some(wanted) = source_suite {
            let matching = suites
                .iter()
                .copied()
                .find(|&suite| reports.name_of(suite) == Some(wanted));
            if matching.is_some() {
                return matching;
            }
        }
    }
    suites.first().copied()
}

/// The leading `<?xml ...?>` declaration of `text`, if any.
///
/// The tree drops the declaration on parse, so it is restored on output.
fn xml_declaration(text: &str) -> Option<&str> {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if !text.starts_with("<?xml") {
        return None;
    }
    let end = text.find("?>")?;
    Some(&text[..end + 2])
}
