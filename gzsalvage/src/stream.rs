//! Stream-level operations.
//!
//! These run the chunked copy loop between caller-owned readers and
//! writers. They do not log and do not touch the file system; the
//! path-level operations in [`crate::ops`] build on them.

use gzsalvage_core::Outcome;
use gzsalvage_core::copy::copy_chunks;
use gzsalvage_core::error::Result;
use gzsalvage_gzip::{GzipDecoder, GzipEncoder};
use std::io::{BufRead, Read, Write};

/// How a recovery pass over a GZIP stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recovery {
    /// Decoded bytes written to the sink.
    pub recovered: u64,
    /// Compressed bytes consumed when input ran out, if it did.
    pub truncated_at: Option<u64>,
}

impl Recovery {
    /// Whether the whole stream decoded without running out of input.
    pub fn is_complete(&self) -> bool {
        self.truncated_at.is_none()
    }

    /// Convert into the operation outcome.
    pub fn into_outcome(self) -> Outcome {
        if self.is_complete() {
            Outcome::Success {
                bytes: self.recovered,
            }
        } else {
            Outcome::partial(self.recovered)
        }
    }
}

/// Compress everything from `source` into a single GZIP member on `sink`.
///
/// Returns the number of uncompressed bytes read.
pub fn compress_stream<R, W>(source: &mut R, sink: &mut W) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write,
{
    let mut encoder = GzipEncoder::new(sink)?;
    let bytes = copy_chunks(source, &mut encoder)?;
    encoder.finish()?;
    Ok(bytes)
}

/// Decompress a GZIP stream into `sink`. Any fault, truncation included,
/// is an error.
///
/// Returns the number of decoded bytes written.
pub fn decompress_stream<R, W>(source: R, sink: &mut W) -> Result<u64>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut decoder = GzipDecoder::new(source)?;
    Ok(copy_chunks(&mut decoder, sink)?)
}

/// Decompress a GZIP stream into `sink`, treating running out of input as
/// the end of the recoverable data.
///
/// Everything decoded before the truncation has been written to `sink`
/// when this returns. Any other fault is an error.
pub fn recover_stream<R, W>(source: R, sink: &mut W) -> Result<Recovery>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut decoder = GzipDecoder::new(source)?;
    salvage(&mut decoder, sink)
}

/// Drain an already-opened decoder into `sink` with recovery semantics.
pub(crate) fn salvage<R, W>(decoder: &mut GzipDecoder<R>, sink: &mut W) -> Result<Recovery>
where
    R: BufRead,
    W: Write + ?Sized,
{
    match copy_chunks(decoder, sink) {
        Ok(recovered) => Ok(Recovery {
            recovered,
            truncated_at: None,
        }),
        Err(fault) if fault.is_read_truncation() => Ok(Recovery {
            recovered: fault.copied,
            truncated_at: Some(decoder.consumed()),
        }),
        Err(fault) => Err(fault.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gzsalvage_core::{FaultClass, SalvageError};
    use std::io::{self, Cursor};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        compress_stream(&mut Cursor::new(data), &mut compressed).unwrap();
        compressed
    }

    #[test]
    fn test_stream_roundtrip() {
        let original = b"stream level roundtrip ".repeat(100);
        let compressed = gzip(&original);

        let mut output = Vec::new();
        let bytes = decompress_stream(compressed.as_slice(), &mut output).unwrap();
        assert_eq!(bytes, original.len() as u64);
        assert_eq!(output, original);
    }

    #[test]
    fn test_decompress_stream_rejects_truncation() {
        let compressed = gzip(b"cut short");
        let mut output = Vec::new();
        let err = decompress_stream(&compressed[..11], &mut output).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn test_recover_stream_complete() {
        let compressed = gzip(b"nothing missing");
        let mut output = Vec::new();
        let recovery = recover_stream(compressed.as_slice(), &mut output).unwrap();

        assert!(recovery.is_complete());
        assert_eq!(recovery.recovered, 15);
        assert_eq!(recovery.into_outcome(), Outcome::Success { bytes: 15 });
    }

    #[test]
    fn test_recover_stream_truncated() {
        let original = b"0123456789".repeat(50);
        let compressed = gzip(&original);
        let cut = &compressed[..compressed.len() - 12];

        let mut output = Vec::new();
        let recovery = recover_stream(cut, &mut output).unwrap();

        assert_eq!(recovery.truncated_at, Some(cut.len() as u64));
        assert_eq!(recovery.recovered, output.len() as u64);
        assert!(original.starts_with(&output));
        assert!(recovery.into_outcome().is_partial());
    }

    #[test]
    fn test_recover_stream_short_trailer_fails() {
        let original = b"23 bytes of plain text.";
        let compressed = gzip(original);
        let cut = &compressed[..compressed.len() - 8];

        let mut output = Vec::new();
        let err = recover_stream(cut, &mut output).unwrap_err();

        assert_eq!(err.class(), FaultClass::UnclassifiedIo);
        assert_eq!(output, original);
    }

    #[test]
    fn test_recover_stream_rejects_bad_header() {
        let mut output = Vec::new();
        let err = recover_stream(&b"definitely not gzip"[..], &mut output).unwrap_err();
        assert_eq!(err.class(), FaultClass::MalformedHeader);
    }

    #[test]
    fn test_write_fault_is_not_salvaged() {
        struct BrokenSink;

        impl Write for BrokenSink {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let compressed = gzip(b"payload");
        let err = recover_stream(compressed.as_slice(), &mut BrokenSink).unwrap_err();
        assert!(matches!(err, SalvageError::Io(_)));
    }
}
