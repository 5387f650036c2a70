//! Chunked copy loop.
//!
//! Moves bytes from a reader to a writer through one reusable buffer. The
//! loop itself is an identity transform: compression or decompression is
//! done by the reader/writer wrappers the caller hands in.

use crate::error::SalvageError;
use std::fmt;
use std::io::{ErrorKind, Read, Write};

/// Capacity of the transfer chunk.
pub const CHUNK_SIZE: usize = 1024;

/// The step of the copy loop that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStep {
    /// Reading from the source.
    Read,
    /// Writing to the target.
    Write,
}

impl fmt::Display for CopyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// A failed copy: which step failed, how far it got, and why.
#[derive(Debug)]
pub struct CopyFault {
    /// Step that raised the error.
    pub step: CopyStep,
    /// Bytes fully written to the target before the failure.
    pub copied: u64,
    /// The error, unclassified.
    pub error: SalvageError,
}

impl CopyFault {
    /// Whether the source ran out of compressed input mid-stream.
    ///
    /// Only read-side truncations count; a writer never produces one.
    pub fn is_read_truncation(&self) -> bool {
        self.step == CopyStep::Read && self.error.is_truncation()
    }
}

impl fmt::Display for CopyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed after {} bytes: {}",
            self.step, self.copied, self.error
        )
    }
}

impl std::error::Error for CopyFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<CopyFault> for SalvageError {
    fn from(fault: CopyFault) -> Self {
        fault.error
    }
}

/// Copy `reader` into `writer` in chunks of [`CHUNK_SIZE`] bytes.
///
/// Returns the number of bytes copied.
pub fn copy_chunks<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, CopyFault>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_chunks_with(reader, writer, |_| {})
}

/// Like [`copy_chunks`], calling `on_chunk` with the size of every chunk
/// after it has been written.
pub fn copy_chunks_with<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    mut on_chunk: F,
) -> Result<u64, CopyFault>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(usize),
{
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut copied = 0u64;

    loop {
        let len = match reader.read(&mut chunk) {
            Ok(0) => return Ok(copied),
            Ok(len) => len,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CopyFault {
                    step: CopyStep::Read,
                    copied,
                    error: e.into(),
                });
            }
        };

        writer.write_all(&chunk[..len]).map_err(|e| CopyFault {
            step: CopyStep::Write,
            copied,
            error: e.into(),
        })?;

        copied += len as u64;
        on_chunk(len);
    }
}
