//! # gzsalvage GZIP
//!
//! Streaming GZIP (RFC 1952) container used by every gzsalvage operation.
//!
//! The deflate transform itself comes from `flate2`; this crate owns the
//! member framing around it: header parsing, the CRC32/ISIZE trailer, and
//! multi-member streams. The decoder reports running out of input as
//! [`SalvageError::Truncated`](gzsalvage_core::SalvageError::Truncated), which
//! is what lets a caller keep the bytes it already decoded.
//!
//! ## Example
//!
//! ```rust
//! use gzsalvage_gzip::{compress, decompress};
//!
//! let data = b"Hello, World! Hello, World!";
//! let compressed = compress(data).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decoder;
pub mod encoder;
pub mod header;

use gzsalvage_core::error::Result;
use std::io::{Read, Write};

pub use decoder::GzipDecoder;
pub use encoder::{DEFAULT_LEVEL, GzipEncoder};
pub use header::{GZIP_MAGIC, GzipHeader};

/// Compress a buffer into a single-member GZIP stream.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzipEncoder::new(Vec::new())?;
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decompress a complete GZIP stream held in memory.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzipDecoder::new(data)?;
    let mut output = Vec::new();
    decoder.read_to_end(&mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gzsalvage_core::SalvageError;

    #[test]
    fn test_compress_decompress() {
        let original = b"Hello, World! Hello, World! Hello, World!";
        let compressed = compress(original).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_decompress_truncated() {
        let compressed = compress(b"never finished").unwrap();
        let err = decompress(&compressed[..12]).unwrap_err();
        assert!(err.is_truncation());

        let err = decompress(&compressed[..compressed.len() - 1]).unwrap_err();
        assert!(matches!(err, SalvageError::TruncatedTrailer { read: 7, .. }));
    }

    #[test]
    fn test_decompress_empty_input() {
        let err = decompress(&[]).unwrap_err();
        assert!(matches!(err, SalvageError::TruncatedHeader { read: 0 }));
    }
}
