//! Utility functions for the CLI.

use gzsalvage::Outcome;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Process exit status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitStatus {
    /// Everything succeeded.
    Success,
    /// A truncated source was salvaged.
    Partial,
    /// Something failed.
    Failure,
}

impl ExitStatus {
    /// Process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 3,
        }
    }
}

impl From<&Outcome> for ExitStatus {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success { .. } => Self::Success,
            Outcome::PartialRecovery { .. } => Self::Partial,
            Outcome::Failure { .. } => Self::Failure,
        }
    }
}

/// JSON form of a single-file operation.
#[derive(Debug, Serialize)]
pub struct OperationJson<'a> {
    operation: &'a str,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

impl<'a> OperationJson<'a> {
    pub fn new(
        operation: &'a str,
        source: &Path,
        target: Option<&Path>,
        outcome: &'a Outcome,
    ) -> Self {
        Self {
            operation,
            source: source.display().to_string(),
            target: target.map(|t| t.display().to_string()),
            outcome,
        }
    }
}

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb
}

/// Print the outcome of one operation and return the matching exit status.
pub fn print_outcome(
    operation: &str,
    source: &Path,
    target: Option<&Path>,
    outcome: &Outcome,
    json: bool,
) -> Result<ExitStatus, serde_json::Error> {
    if json {
        let output = OperationJson::new(operation, source, target, outcome);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(outcome.into());
    }

    let arrow = target
        .map(|t| format!(" -> {}", t.display()))
        .unwrap_or_default();

    match outcome {
        Outcome::Success { bytes } => {
            println!("{} {}{}: OK ({} bytes)", operation, source.display(), arrow, bytes);
        }
        Outcome::PartialRecovery { note, .. } => {
            println!("{} {}{}: PARTIAL - {}", operation, source.display(), arrow, note);
        }
        Outcome::Failure { class, message } => {
            eprintln!("{} {}: FAILED [{}] - {}", operation, source.display(), class, message);
        }
    }

    Ok(outcome.into())
}

/// `file` -> `file.gz`
pub fn compressed_name(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".gz");
    PathBuf::from(name)
}

/// `file.gz` -> `file`; anything else -> `file.out` appended, so the
/// result never names the input itself.
pub fn decompressed_name(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("gz") => input.with_extension(""),
        _ => {
            let mut name = OsString::from(input.as_os_str());
            name.push(".out");
            PathBuf::from(name)
        }
    }
}

/// Refuse to run an operation whose output would overwrite its input.
pub fn ensure_distinct(operation: &str, input: &Path, output: &Path) -> Result<(), String> {
    let same = input == output
        || matches!(
            (input.canonicalize(), output.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(format!(
            "{} output must differ from its input: {}",
            operation,
            input.display()
        ));
    }
    Ok(())
}
