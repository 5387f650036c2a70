//! Verify command implementation.

use super::CommandResult;
use crate::utils::{ExitStatus, OperationJson, print_outcome};
use std::path::PathBuf;

pub fn cmd_verify(files: &[PathBuf], json: bool) -> CommandResult {
    let outcomes: Vec<_> = files
        .iter()
        .map(|file| (file, gzsalvage::verify(file)))
        .collect();

    let status = outcomes
        .iter()
        .map(|(_, outcome)| ExitStatus::from(outcome))
        .max()
        .unwrap_or(ExitStatus::Success);

    if json {
        let output: Vec<_> = outcomes
            .iter()
            .map(|(file, outcome)| OperationJson::new("verify", file, None, outcome))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(status);
    }

    for (file, outcome) in &outcomes {
        print_outcome("verify", file, None, outcome, false)?;
    }
    if outcomes.len() > 1 {
        println!();
        println!(
            "{} file(s): {} ok, {} truncated, {} failed",
            outcomes.len(),
            outcomes.iter().filter(|(_, o)| o.is_success()).count(),
            outcomes.iter().filter(|(_, o)| o.is_partial()).count(),
            outcomes.iter().filter(|(_, o)| o.is_failure()).count()
        );
    }

    Ok(status)
}
