//! Error types for gzsalvage operations.
//!
//! Every failure is a [`SalvageError`] variant, and every variant maps to
//! exactly one [`FaultClass`]. Recovery decisions are made on the class,
//! never on the rendered message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gzsalvage operations.
#[derive(Debug, Error)]
pub enum SalvageError {
    /// The source path could not be opened for reading.
    #[error("source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The target path could not be created for writing.
    #[error("target unwritable: {}: {source}", .path.display())]
    TargetUnwritable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// Invalid magic number in the GZIP header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Unsupported compression method in the GZIP header.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The compression method identifier.
        method: String,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// The header ended before all of its fields were read.
    #[error("Truncated header: input ended after {read} header bytes")]
    TruncatedHeader {
        /// Number of header bytes read before end of input.
        read: usize,
    },

    /// The compressed stream ended before the deflate stream or trailer
    /// was complete.
    #[error("Unexpected end of compressed stream at offset {offset} after {decoded} decoded bytes")]
    Truncated {
        /// Compressed bytes consumed when input ran out.
        offset: u64,
        /// Decoded bytes produced before input ran out.
        decoded: u64,
    },

    /// The deflate stream ended but the member trailer after it is
    /// incomplete.
    #[error("Truncated trailer: input ended after {read} of 8 trailer bytes at offset {offset}")]
    TruncatedTrailer {
        /// Compressed bytes consumed when input ran out.
        offset: u64,
        /// Number of trailer bytes read.
        read: usize,
    },

    /// Corrupted data in the compressed stream.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// CRC checksum mismatch in a member trailer.
    #[error("CRC mismatch: expected {expected:#x}, computed {computed:#x}")]
    CrcMismatch {
        /// Expected CRC value from the trailer.
        expected: u32,
        /// Computed CRC value from the decoded data.
        computed: u32,
    },

    /// ISIZE mismatch in a member trailer.
    #[error("Size mismatch: expected {expected} (mod 2^32), decoded {actual}")]
    SizeMismatch {
        /// Expected size from the trailer.
        expected: u32,
        /// Decoded size, modulo 2^32.
        actual: u32,
    },

    /// I/O error from an underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// Result type alias for gzsalvage operations.
pub type Result<T> = std::result::Result<T, SalvageError>;

/// Classification of a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    /// Source path missing or unreadable.
    SourceUnavailable,
    /// Target path cannot be created.
    TargetUnwritable,
    /// Source does not begin with a valid GZIP header.
    MalformedHeader,
    /// Compressed input ran out after the header was parsed.
    BenignTruncation,
    /// The compressed data itself is wrong.
    CorruptData,
    /// Any other I/O-layer error.
    UnclassifiedIo,
}

impl FaultClass {
    /// Short label used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SourceUnavailable => "source-unavailable",
            Self::TargetUnwritable => "target-unwritable",
            Self::MalformedHeader => "malformed-header",
            Self::BenignTruncation => "benign-truncation",
            Self::CorruptData => "corrupt-data",
            Self::UnclassifiedIo => "io",
        }
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SalvageError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a target-unwritable error.
    pub fn target_unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::TargetUnwritable {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a truncated header error.
    pub fn truncated_header(read: usize) -> Self {
        Self::TruncatedHeader { read }
    }

    /// Create a truncated stream error.
    pub fn truncated(offset: u64, decoded: u64) -> Self {
        Self::Truncated { offset, decoded }
    }

    /// Create a truncated trailer error.
    pub fn truncated_trailer(offset: u64, read: usize) -> Self {
        Self::TruncatedTrailer { offset, read }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u32, actual: u32) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Classify this error.
    pub fn class(&self) -> FaultClass {
        match self {
            Self::SourceUnavailable { .. } => FaultClass::SourceUnavailable,
            Self::TargetUnwritable { .. } => FaultClass::TargetUnwritable,
            Self::InvalidMagic { .. }
            | Self::UnsupportedMethod { .. }
            | Self::InvalidHeader { .. }
            | Self::TruncatedHeader { .. } => FaultClass::MalformedHeader,
            Self::Truncated { .. } => FaultClass::BenignTruncation,
            Self::CorruptedData { .. } | Self::CrcMismatch { .. } | Self::SizeMismatch { .. } => {
                FaultClass::CorruptData
            }
            Self::TruncatedTrailer { .. } | Self::Io(_) => FaultClass::UnclassifiedIo,
        }
    }

    /// Whether this error means the compressed input simply ran out.
    pub fn is_truncation(&self) -> bool {
        self.class() == FaultClass::BenignTruncation
    }

    /// The `io::ErrorKind` used when this error travels through `io::Read`.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::SourceUnavailable { source, .. } | Self::TargetUnwritable { source, .. } => {
                source.kind()
            }
            Self::Truncated { .. }
            | Self::TruncatedHeader { .. }
            | Self::TruncatedTrailer { .. } => io::ErrorKind::UnexpectedEof,
            Self::Io(e) => e.kind(),
            _ => io::ErrorKind::InvalidData,
        }
    }
}

/// Unwraps a [`SalvageError`] that was carried inside an `io::Error`;
/// anything else becomes [`SalvageError::Io`].
impl From<io::Error> for SalvageError {
    fn from(err: io::Error) -> Self {
        let ours = err
            .get_ref()
            .is_some_and(|inner| inner.is::<SalvageError>());
        if !ours {
            return Self::Io(err);
        }

        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<SalvageError>()) {
            Some(Ok(salvage)) => *salvage,
            Some(Err(other)) => Self::Io(io::Error::new(kind, other)),
            None => Self::Io(kind.into()),
        }
    }
}

impl From<SalvageError> for io::Error {
    fn from(err: SalvageError) -> Self {
        match err {
            SalvageError::Io(e) => e,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}
