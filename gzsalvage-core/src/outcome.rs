//! Operation outcomes.

use crate::error::{FaultClass, SalvageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a path-level operation.
///
/// Operations never panic or return a bare error across their public
/// boundary; every call ends in one of these three states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The operation completed cleanly.
    Success {
        /// Uncompressed bytes that went through the operation.
        bytes: u64,
    },
    /// The source was truncated; everything decodable before the
    /// truncation was written and the target finalized.
    PartialRecovery {
        /// Bytes salvaged into the target.
        recovered: u64,
        /// Advisory note, suitable for a warning-level log line.
        note: String,
    },
    /// The operation failed.
    Failure {
        /// Classification of the fault.
        class: FaultClass,
        /// Human-readable description.
        message: String,
    },
}

impl Outcome {
    /// Build a failure from an error.
    pub fn failure(err: &SalvageError) -> Self {
        Self::Failure {
            class: err.class(),
            message: err.to_string(),
        }
    }

    /// Build a partial recovery with the standard note.
    pub fn partial(recovered: u64) -> Self {
        Self::PartialRecovery {
            recovered,
            note: format!("recovered {} bytes before truncation", recovered),
        }
    }

    /// Clean success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Success with partial recovery.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::PartialRecovery { .. })
    }

    /// Failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Uncompressed bytes handled, if the operation did not fail.
    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Success { bytes } => Some(*bytes),
            Self::PartialRecovery { recovered, .. } => Some(*recovered),
            Self::Failure { .. } => None,
        }
    }

    /// Fault class of a failure.
    pub fn fault_class(&self) -> Option<FaultClass> {
        match self {
            Self::Failure { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Failure message or partial-recovery note.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::PartialRecovery { note, .. } => Some(note),
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { bytes } => write!(f, "ok ({} bytes)", bytes),
            Self::PartialRecovery { note, .. } => write!(f, "partial: {}", note),
            Self::Failure { class, message } => write!(f, "failed [{}]: {}", class, message),
        }
    }
}
