//! Command implementations for the gzsalvage CLI.

pub mod completions;
pub mod info;
pub mod restore;
pub mod transfer;
pub mod verify;

pub use completions::cmd_completions;
pub use info::cmd_info;
pub use restore::cmd_restore;
pub use transfer::{cmd_compress, cmd_decompress, cmd_recover, cmd_repair};
pub use verify::cmd_verify;

use crate::utils::ExitStatus;

/// Result of a command: the exit status to report, or an error that
/// prevented the command from running at all.
pub type CommandResult = Result<ExitStatus, Box<dyn std::error::Error>>;
