//! Restore command implementation.

use super::CommandResult;
use crate::utils::{ExitStatus, create_progress_bar};
use gzsalvage::{RestoreStatus, restore_dir_with};
use std::path::Path;

pub fn cmd_restore(dir: &Path, pattern: &str, progress: bool, json: bool) -> CommandResult {
    let pb = create_progress_bar(0, progress);

    let report = restore_dir_with(dir, pattern, |file| {
        pb.inc_length(1);
        pb.inc(1);
        if let Some(name) = file.path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
    })?;
    pb.finish_and_clear();

    let status = if report.failed() > 0 {
        ExitStatus::Failure
    } else if report.repaired() > 0 {
        ExitStatus::Partial
    } else {
        ExitStatus::Success
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(status);
    }

    println!("Restoring {} ({})", dir.display(), pattern);
    for file in &report.files {
        let name = file.path.display();
        match &file.status {
            RestoreStatus::Skipped => println!("  SKIPPED:  {} (empty)", name),
            RestoreStatus::Healthy => println!("  OK:       {}", name),
            RestoreStatus::Repaired { recovered } => {
                println!("  REPAIRED: {} ({} bytes kept)", name, recovered)
            }
            RestoreStatus::Failed { message } => println!("  FAILED:   {} - {}", name, message),
        }
    }

    println!();
    println!(
        "{} file(s): {} repaired, {} ok, {} skipped, {} failed",
        report.files.len(),
        report.repaired(),
        report.healthy(),
        report.skipped(),
        report.failed()
    );

    Ok(status)
}
