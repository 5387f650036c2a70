//! Path-level operations.
//!
//! Each operation owns its source and target files for the duration of the
//! call and always returns an [`Outcome`]. The source is opened (and for
//! GZIP input, its header parsed) before the target is created, so a source
//! fault never leaves an empty target behind. A target that resolves to the
//! source file is refused as unwritable before either is opened.

use crate::stream::{Recovery, salvage};
use gzsalvage_core::Outcome;
use gzsalvage_core::copy::copy_chunks;
use gzsalvage_core::error::{Result, SalvageError};
use gzsalvage_gzip::{GzipDecoder, GzipEncoder};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Compress `source` into a new GZIP file at `target`, replacing any
/// existing file.
pub fn compress(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Outcome {
    let (source, target) = (source.as_ref(), target.as_ref());
    let outcome = into_outcome(try_compress(source, target));
    report("compress", source, Some(target), &outcome);
    outcome
}

/// Decompress the GZIP file at `source` into `target`.
///
/// All-or-nothing: a truncated source is a failure like any other fault.
pub fn decompress(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Outcome {
    let (source, target) = (source.as_ref(), target.as_ref());
    let outcome = into_outcome(try_decompress(source, target));
    report("decompress", source, Some(target), &outcome);
    outcome
}

/// Decompress the GZIP file at `source` into `target`, keeping every byte
/// decoded before a truncation.
///
/// A truncated source yields [`Outcome::PartialRecovery`] with the target
/// flushed, synced and closed. Every other fault is reported exactly as
/// [`decompress`] reports it.
pub fn recover(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Outcome {
    let (source, target) = (source.as_ref(), target.as_ref());
    let outcome = recovery_outcome(try_recover(source, target));
    report("recover", source, Some(target), &outcome);
    outcome
}

/// Recover the GZIP file at `source` into a fresh, complete GZIP file at
/// `target`.
///
/// On truncation the new file holds the salvaged prefix and has a valid
/// trailer.
pub fn repair(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Outcome {
    let (source, target) = (source.as_ref(), target.as_ref());
    let outcome = recovery_outcome(try_repair(source, target));
    report("repair", source, Some(target), &outcome);
    outcome
}

/// Check the GZIP file at `source` without writing anything.
///
/// [`Outcome::Success`] means the file is healthy,
/// [`Outcome::PartialRecovery`] that it is truncated but salvageable.
pub fn verify(source: impl AsRef<Path>) -> Outcome {
    let source = source.as_ref();
    let outcome = recovery_outcome(try_verify(source));
    report("verify", source, None, &outcome);
    outcome
}

fn try_compress(source: &Path, target: &Path) -> Result<u64> {
    ensure_distinct(source, target)?;
    let mut input = open_source(source)?;
    let mut encoder = GzipEncoder::new(create_target(target)?)?;
    let bytes = copy_chunks(&mut input, &mut encoder)?;
    finish_target(encoder.finish()?)?;
    Ok(bytes)
}

fn try_decompress(source: &Path, target: &Path) -> Result<u64> {
    ensure_distinct(source, target)?;
    let mut decoder = open_gzip(source)?;
    let mut output = create_target(target)?;
    let bytes = copy_chunks(&mut decoder, &mut output)?;
    finish_target(output)?;
    Ok(bytes)
}

fn try_recover(source: &Path, target: &Path) -> Result<Recovery> {
    ensure_distinct(source, target)?;
    let mut decoder = open_gzip(source)?;
    let mut output = create_target(target)?;
    let recovery = salvage(&mut decoder, &mut output)?;
    finish_target(output)?;
    Ok(recovery)
}

fn try_repair(source: &Path, target: &Path) -> Result<Recovery> {
    ensure_distinct(source, target)?;
    let mut decoder = open_gzip(source)?;
    let mut encoder = GzipEncoder::new(create_target(target)?)?;
    let recovery = salvage(&mut decoder, &mut encoder)?;
    finish_target(encoder.finish()?)?;
    Ok(recovery)
}

fn try_verify(source: &Path) -> Result<Recovery> {
    let mut decoder = open_gzip(source)?;
    salvage(&mut decoder, &mut io::sink())
}

fn into_outcome(result: Result<u64>) -> Outcome {
    match result {
        Ok(bytes) => Outcome::Success { bytes },
        Err(e) => Outcome::failure(&e),
    }
}

fn recovery_outcome(result: Result<Recovery>) -> Outcome {
    match result {
        Ok(recovery) => recovery.into_outcome(),
        Err(e) => Outcome::failure(&e),
    }
}

/// Creating the target truncates it, so it must never be the source.
fn ensure_distinct(source: &Path, target: &Path) -> Result<()> {
    let same = source == target
        || matches!(
            (fs::canonicalize(source), fs::canonicalize(target)),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(SalvageError::target_unwritable(
            target,
            io::Error::new(io::ErrorKind::InvalidInput, "target is the source file"),
        ));
    }
    Ok(())
}

fn open_source(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| SalvageError::source_unavailable(path, e))
}

fn open_gzip(path: &Path) -> Result<GzipDecoder<BufReader<File>>> {
    GzipDecoder::new(open_source(path)?)
}

fn create_target(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| SalvageError::target_unwritable(path, e))
}

/// Flush buffered bytes and sync them to disk before the file closes.
fn finish_target(writer: BufWriter<File>) -> Result<()> {
    let file = writer
        .into_inner()
        .map_err(|e| SalvageError::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

fn report(operation: &str, source: &Path, target: Option<&Path>, outcome: &Outcome) {
    match (outcome, target) {
        (Outcome::Success { bytes }, Some(target)) => {
            log::info!(
                "{}: {} -> {} ({} bytes)",
                operation,
                source.display(),
                target.display(),
                bytes
            );
        }
        (Outcome::Success { bytes }, None) => {
            log::info!("{}: {} ok ({} bytes)", operation, source.display(), bytes);
        }
        (Outcome::PartialRecovery { note, .. }, _) => {
            log::warn!(
                "{}: truncated file recovered, path: {}: {}",
                operation,
                source.display(),
                note
            );
        }
        (Outcome::Failure { class, message }, _) => {
            log::error!(
                "{}: error occurred on {}, class={}, error={}",
                operation,
                source.display(),
                class,
                message
            );
        }
    }
}
