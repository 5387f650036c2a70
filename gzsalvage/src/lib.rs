//! # gzsalvage
//!
//! Compress and decompress GZIP files, and salvage the readable part of
//! GZIP files that were cut short.
//!
//! A producer that is killed while writing a GZIP file leaves behind a valid
//! header followed by an unfinished deflate stream. [`recover`] decodes such
//! a file as far as the data goes and keeps everything it decoded, while
//! still treating a bad header, corrupt data or a checksum mismatch as real
//! failures.
//!
//! ## Operations
//!
//! | Operation      | Truncated source                         | Other faults |
//! |----------------|------------------------------------------|--------------|
//! | [`compress`]   | n/a                                      | `Failure`    |
//! | [`decompress`] | `Failure`                                | `Failure`    |
//! | [`recover`]    | `PartialRecovery`, prefix in target      | `Failure`    |
//! | [`repair`]     | `PartialRecovery`, prefix re-compressed  | `Failure`    |
//! | [`verify`]     | `PartialRecovery`, nothing written       | `Failure`    |
//!
//! Path-level operations never return an error: every call ends in an
//! [`Outcome`]. The stream-level functions in [`stream`] return
//! [`Result`](gzsalvage_core::Result) instead and leave I/O ownership to the
//! caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gzsalvage::{Outcome, recover};
//!
//! match recover("events.log.gz", "events.log") {
//!     Outcome::Success { bytes } => println!("intact, {} bytes", bytes),
//!     Outcome::PartialRecovery { note, .. } => println!("truncated: {}", note),
//!     Outcome::Failure { message, .. } => eprintln!("failed: {}", message),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod ops;
pub mod restore;
pub mod stream;

pub use gzsalvage_core::{FaultClass, Outcome, SalvageError};
pub use ops::{compress, decompress, recover, repair, verify};
pub use restore::{
    DEFAULT_PATTERN, RestoreReport, RestoreStatus, RestoredFile, restore_dir, restore_dir_with,
};
pub use stream::{Recovery, compress_stream, decompress_stream, recover_stream};
