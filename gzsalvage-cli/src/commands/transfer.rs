//! Single-file commands: compress, decompress, recover and repair.

use super::CommandResult;
use crate::utils::{compressed_name, decompressed_name, ensure_distinct, print_outcome};
use std::path::{Path, PathBuf};

pub fn cmd_compress(input: &Path, output: Option<PathBuf>, json: bool) -> CommandResult {
    let output = output.unwrap_or_else(|| compressed_name(input));
    ensure_distinct("compress", input, &output)?;
    let outcome = gzsalvage::compress(input, &output);
    Ok(print_outcome("compress", input, Some(&output), &outcome, json)?)
}

pub fn cmd_decompress(input: &Path, output: Option<PathBuf>, json: bool) -> CommandResult {
    let output = output.unwrap_or_else(|| decompressed_name(input));
    ensure_distinct("decompress", input, &output)?;
    let outcome = gzsalvage::decompress(input, &output);
    Ok(print_outcome("decompress", input, Some(&output), &outcome, json)?)
}

pub fn cmd_recover(input: &Path, output: Option<PathBuf>, json: bool) -> CommandResult {
    let output = output.unwrap_or_else(|| decompressed_name(input));
    ensure_distinct("recover", input, &output)?;
    let outcome = gzsalvage::recover(input, &output);
    Ok(print_outcome("recover", input, Some(&output), &outcome, json)?)
}

pub fn cmd_repair(input: &Path, output: &Path, json: bool) -> CommandResult {
    if let Err(e) = ensure_distinct("repair", input, output) {
        return Err(format!("{}; use `restore` to repair in place", e).into());
    }
    let outcome = gzsalvage::repair(input, output);
    Ok(print_outcome("repair", input, Some(output), &outcome, json)?)
}
