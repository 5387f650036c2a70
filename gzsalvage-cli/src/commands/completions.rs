//! Shell completion generation.

use super::CommandResult;
use crate::Cli;
use crate::utils::ExitStatus;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

pub fn cmd_completions(shell: Shell) -> CommandResult {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut io::stdout());
    Ok(ExitStatus::Success)
}
