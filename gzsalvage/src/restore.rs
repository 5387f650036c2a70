//! Crash restore of a directory of GZIP files.
//!
//! After an abnormal shutdown a producer's working directory can hold GZIP
//! files that were never finished. [`restore_dir`] checks each of them and
//! rewrites the truncated ones in place as complete files holding whatever
//! was decodable.

use crate::ops::{repair, verify};
use glob::Pattern;
use gzsalvage_core::Outcome;
use gzsalvage_core::error::{Result, SalvageError};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default file name pattern for [`restore_dir`].
pub const DEFAULT_PATTERN: &str = "*.gz";

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreStatus {
    /// Empty file; nothing to salvage.
    Skipped,
    /// The file decoded cleanly and was left alone.
    Healthy,
    /// The file was truncated and has been replaced by a repaired copy.
    Repaired {
        /// Decoded bytes kept in the repaired file.
        recovered: u64,
    },
    /// The file could not be restored and was left alone.
    Failed {
        /// Why.
        message: String,
    },
}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoredFile {
    /// Path of the file.
    pub path: PathBuf,
    /// What happened to it.
    #[serde(flatten)]
    pub status: RestoreStatus,
}

/// Per-file results of a directory restore, in file name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    /// Scanned files.
    pub files: Vec<RestoredFile>,
}

impl RestoreReport {
    fn count(&self, predicate: impl Fn(&RestoreStatus) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.status)).count()
    }

    /// Number of files that were repaired.
    pub fn repaired(&self) -> usize {
        self.count(|s| matches!(s, RestoreStatus::Repaired { .. }))
    }

    /// Number of files that could not be restored.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RestoreStatus::Failed { .. }))
    }

    /// Number of healthy files.
    pub fn healthy(&self) -> usize {
        self.count(|s| *s == RestoreStatus::Healthy)
    }

    /// Number of skipped (empty) files.
    pub fn skipped(&self) -> usize {
        self.count(|s| *s == RestoreStatus::Skipped)
    }
}

/// Restore every file in `dir` whose name matches `pattern`.
///
/// The scan is not recursive. A failure on one file is recorded in the
/// report and does not stop the scan; only an unreadable directory or an
/// invalid pattern is an error.
pub fn restore_dir(dir: impl AsRef<Path>, pattern: &str) -> Result<RestoreReport> {
    restore_dir_with(dir, pattern, |_| {})
}

/// Like [`restore_dir`], calling `on_file` after each file is handled.
pub fn restore_dir_with<F>(
    dir: impl AsRef<Path>,
    pattern: &str,
    mut on_file: F,
) -> Result<RestoreReport>
where
    F: FnMut(&RestoredFile),
{
    let dir = dir.as_ref();
    let paths = matching_files(dir, pattern)?;
    log::debug!(
        "restore: {} file(s) matching {:?} in {}",
        paths.len(),
        pattern,
        dir.display()
    );

    let mut report = RestoreReport::default();
    for path in paths {
        let status = restore_file(&path);
        let file = RestoredFile { path, status };
        on_file(&file);
        report.files.push(file);
    }

    log::info!(
        "restore: {} repaired, {} healthy, {} skipped, {} failed",
        report.repaired(),
        report.healthy(),
        report.skipped(),
        report.failed()
    );
    Ok(report)
}

/// Regular files in `dir` matching `pattern`, sorted by name.
fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)
        .map_err(|e| SalvageError::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
    let entries = fs::read_dir(dir).map_err(|e| SalvageError::source_unavailable(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if pattern.matches(&entry.file_name().to_string_lossy()) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn restore_file(path: &Path) -> RestoreStatus {
    match fs::metadata(path) {
        Ok(metadata) if metadata.len() == 0 => return RestoreStatus::Skipped,
        Ok(_) => {}
        Err(e) => {
            return RestoreStatus::Failed {
                message: SalvageError::source_unavailable(path, e).to_string(),
            };
        }
    }

    match verify(path) {
        Outcome::Success { .. } => RestoreStatus::Healthy,
        Outcome::PartialRecovery { .. } => repair_in_place(path),
        Outcome::Failure { message, .. } => RestoreStatus::Failed { message },
    }
}

/// Repair into a sibling file, then move it over the original.
fn repair_in_place(path: &Path) -> RestoreStatus {
    let temp = repair_path(path);

    let recovered = match repair(path, &temp) {
        Outcome::Success { bytes } => bytes,
        Outcome::PartialRecovery { recovered, .. } => recovered,
        Outcome::Failure { message, .. } => {
            remove_temp(&temp);
            return RestoreStatus::Failed { message };
        }
    };

    match fs::rename(&temp, path) {
        Ok(()) => RestoreStatus::Repaired { recovered },
        Err(e) => {
            remove_temp(&temp);
            RestoreStatus::Failed {
                message: format!("cannot replace {}: {}", path.display(), e),
            }
        }
    }
}

/// `dir/name.gz` -> `dir/.name.gz.repair`
fn repair_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".repair");
    path.with_file_name(name)
}

fn remove_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp) {
        if e.kind() != io::ErrorKind::NotFound {
            log::warn!("restore: cannot remove {}: {}", temp.display(), e);
        }
    }
}
