//! # gzsalvage core
//!
//! Core components shared by every gzsalvage layer:
//!
//! - [`error`]: the error type and its fault classification
//! - [`copy`]: the chunked copy loop every operation runs
//! - [`outcome`]: the three-state result of a path-level operation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     gzsalvage binary                                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Operations                                          │
//! │     compress, decompress, recover, repair, restore      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container                                           │
//! │     GZIP header, streaming decoder/encoder              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     SalvageError, FaultClass, copy loop, Outcome        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use gzsalvage_core::copy::copy_chunks;
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! let copied = copy_chunks(&mut Cursor::new(b"payload"), &mut output).unwrap();
//! assert_eq!(copied, 7);
//! assert_eq!(output, b"payload");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod copy;
pub mod error;
pub mod outcome;

// Re-exports for convenience
pub use copy::{CHUNK_SIZE, CopyFault, CopyStep, copy_chunks, copy_chunks_with};
pub use error::{FaultClass, Result, SalvageError};
pub use outcome::Outcome;
