//! Source/target pairing and the top-level merge run
//!
//! A source is either a single report file or a directory of reports. For a
//! directory every file below it, including symlinks to files, is paired
//! with the file at the same relative path under the target directory. Pairs
//! whose target exists are merged; the others are copied into place
//! (creating parent directories), unless running in update-only mode.
//!
//! Several sources are applied to the same target strictly in the order
//! given, so later sources win for test cases they share with earlier ones.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::merge::{merge_file, MergeOutcome};
use crate::options::MergeOptions;

/// A source report file and the target path it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub source: PathBuf,
    pub target: PathBuf,
    pub target_exists: bool,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files merged into an existing target (including blank-source copies
    /// and blank targets left alone).
    pub merged: usize,
    /// Source files copied to a target that did not exist.
    pub copied: usize,
    /// Source files ignored because their target did not exist in
    /// update-only mode.
    pub ignored: usize,
}

/// Fail with `Error::NotFound` naming every path that does not exist.
pub fn ensure_exist<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<()> {
    let missing: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| !path.exists())
        .map(Path::to_path_buf)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::NotFound { paths: missing })
    }
}

/// Pair every file of `source` with its counterpart under `target`.
///
/// A file source pairs with `target` itself, or with a file of the same name
/// inside `target` when `target` is a directory. Directory entries are
/// visited in file-name order.
pub fn pairs(source: &Path, target: &Path) -> Result<Vec<FilePair>> {
    if !source.is_dir() {
        let target = if target.is_dir() {
            let file_name = source.file_name().ok_or_else(|| Error::Path {
                message: format!("Source has no file name: {}", source.display()),
            })?;
            target.join(file_name)
        } else {
            target.to_path_buf()
        };
        let target_exists = target.exists();
        return Ok(vec![FilePair {
            source: source.to_path_buf(),
            target,
            target_exists,
        }]);
    }

    let mut pairs = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        // Follows symlinks, so linked report files are paired too.
        if !entry.path().is_file() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| Error::Path {
                message: format!("Failed to make path relative: {}", entry.path().display()),
            })?;
        let target_path = target.join(relative_path);
        let target_exists = target_path.exists();
        pairs.push(FilePair {
            source: entry.path().to_path_buf(),
            target: target_path,
            target_exists,
        });
    }
    Ok(pairs)
}

/// Merge one file pair, copying the source when the target is missing.
pub fn process_pair(pair: &FilePair, options: &MergeOptions, stats: &mut RunStats) -> Result<()> {
    if pair.target_exists {
        let outcome = merge_file(&pair.source, &pair.target, options)?;
        if outcome == MergeOutcome::Unchanged {
            debug!("{}: left unchanged", pair.target.display());
        }
        stats.merged += 1;
    } else if options.update_only {
        debug!(
            "{}: no target, ignoring {} in update-only mode",
            pair.target.display(),
            pair.source.display()
        );
        stats.ignored += 1;
    } else {
        if let Some(parent) = pair.target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&pair.source, &pair.target)?;
        info!(
            "{}: copied from {}",
            pair.target.display(),
            pair.source.display()
        );
        stats.copied += 1;
    }
    Ok(())
}

/// Merge every source, in order, into `target`.
///
/// All paths are checked before anything is written.
///
/// # Errors
///
/// Returns `Error::NotFound` naming all missing paths, or the first error
/// raised while merging; the run stops at that file.
pub fn run(sources: &[PathBuf], target: &Path, options: &MergeOptions) -> Result<RunStats> {
    let mut stats = RunStats::default();
    if sources.is_empty() {
        warn!("No source paths given; nothing to merge into {}", target.display());
        return Ok(stats);
    }

    ensure_exist(
        sources
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(target)),
    )?;

    for source in sources {
        for pair in pairs(source, target)? {
            process_pair(&pair, options, &mut stats)?;
        }
    }
    Ok(stats)
}
