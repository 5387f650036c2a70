//! Streaming GZIP encoder.

use crate::header::GzipHeader;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use gzsalvage_core::error::Result;
use std::io::{self, Write};

/// Default compression level.
pub const DEFAULT_LEVEL: u8 = 6;

/// Streaming GZIP encoder.
///
/// The header is written when the encoder is created. The trailer is only
/// written by [`GzipEncoder::finish`]; an encoder that is dropped instead
/// leaves an incomplete member behind.
pub struct GzipEncoder<W: Write> {
    inner: DeflateEncoder<W>,
    crc: Crc,
}

impl<W: Write> GzipEncoder<W> {
    /// Create an encoder with the default header and level.
    pub fn new(writer: W) -> Result<Self> {
        Self::with_level(writer, DEFAULT_LEVEL)
    }

    /// Create an encoder with a specific compression level (0-9).
    pub fn with_level(writer: W, level: u8) -> Result<Self> {
        Self::with_header(writer, GzipHeader::new(), level)
    }

    /// Create an encoder with a specific header and compression level.
    ///
    /// The header's XFL field is derived from the level.
    pub fn with_header(mut writer: W, mut header: GzipHeader, level: u8) -> Result<Self> {
        let level = level.min(9);
        header.xfl = match level {
            0..=1 => 4, // Fastest
            9 => 2,     // Maximum compression
            _ => 0,     // Default
        };
        header.write(&mut writer)?;

        Ok(Self {
            inner: DeflateEncoder::new(writer, Compression::new(u32::from(level))),
            crc: Crc::new(),
        })
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Uncompressed bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    /// Finish the deflate stream, write the trailer, and return the writer.
    pub fn finish(self) -> Result<W> {
        let crc = self.crc;
        let mut writer = self.inner.finish()?;

        writer.write_all(&crc.sum().to_le_bytes())?;
        writer.write_all(&crc.amount().to_le_bytes())?;
        writer.flush()?;

        Ok(writer)
    }
}

impl<W: Write> Write for GzipEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.crc.update(&buf[..n]);
        Ok(n)
    }

    /// Sync-flush: everything written so far becomes decodable from the
    /// underlying writer's bytes.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::GzipDecoder;
    use crate::header::{GZIP_MAGIC, TRAILER_LEN};
    use std::io::{Cursor, Read};

    #[test]
    fn test_header_and_trailer_layout() {
        let mut encoder = GzipEncoder::new(Vec::new()).unwrap();
        encoder.write_all(b"abc").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(compressed[..2], GZIP_MAGIC);
        assert_eq!(compressed[2], 8);

        let trailer = &compressed[compressed.len() - TRAILER_LEN..];
        // CRC-32 of "abc"
        assert_eq!(trailer[..4], 0x352441C2u32.to_le_bytes());
        assert_eq!(trailer[4..], 3u32.to_le_bytes());
    }

    #[test]
    fn test_xfl_follows_level() {
        let fast = GzipEncoder::with_level(Vec::new(), 1).unwrap().finish().unwrap();
        let best = GzipEncoder::with_level(Vec::new(), 9).unwrap().finish().unwrap();
        let default = GzipEncoder::new(Vec::new()).unwrap().finish().unwrap();

        assert_eq!(fast[8], 4);
        assert_eq!(best[8], 2);
        assert_eq!(default[8], 0);
    }

    #[test]
    fn test_repeated_compresses_well() {
        let original = vec![b'A'; 10000];
        let mut encoder = GzipEncoder::with_level(Vec::new(), 9).unwrap();
        encoder.write_all(&original).unwrap();
        assert_eq!(encoder.total_in(), 10000);
        let compressed = encoder.finish().unwrap();

        assert!(compressed.len() < original.len() / 10);

        let mut decoded = Vec::new();
        GzipDecoder::new(Cursor::new(compressed))
            .unwrap()
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_flush_makes_prefix_decodable() {
        let mut encoder = GzipEncoder::new(Vec::new()).unwrap();
        encoder.write_all(b"flushed part|").unwrap();
        encoder.flush().unwrap();
        let flushed_len = encoder.get_ref().len();
        encoder.write_all(b"unflushed part").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut decoder = GzipDecoder::new(Cursor::new(&compressed[..flushed_len])).unwrap();
        let mut decoded = Vec::new();
        let err = decoder.read_to_end(&mut decoded).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(decoded, b"flushed part|");
    }
}
