//! Streaming GZIP decoder.
//!
//! [`GzipDecoder`] parses the member header up front and then inflates the
//! body on demand through `io::Read`. Running out of compressed input is
//! reported as [`SalvageError::Truncated`], distinct from corrupt deflate
//! data or a bad trailer, so callers can tell "the writer died" apart from
//! "the bytes are wrong". Only a body cut mid-block counts: a deflate
//! stream that ended cleanly followed by a short trailer is
//! [`SalvageError::TruncatedTrailer`].
//!
//! Concatenated members are decoded in sequence. Bytes following a member
//! that do not start with the GZIP magic, or a following header that is
//! cut short, end the stream.

use crate::header::{GzipHeader, TRAILER_LEN, read_up_to};
use flate2::{Crc, Decompress, FlushDecompress, Status};
use gzsalvage_core::error::{Result, SalvageError};
use std::io::{self, BufRead, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Inflating a member body.
    Body,
    /// Body finished, trailer not yet read.
    Trailer,
    /// No more members.
    Done,
}

/// Streaming GZIP decoder over a buffered reader.
pub struct GzipDecoder<R: BufRead> {
    reader: R,
    header: GzipHeader,
    inflate: Decompress,
    crc: Crc,
    state: State,
    verify_trailer: bool,
    /// Compressed bytes consumed, headers and trailers included.
    consumed: u64,
    /// Decoded bytes produced across all members.
    decoded: u64,
    members: usize,
}

impl<R: BufRead> GzipDecoder<R> {
    /// Create a decoder, reading the first member header immediately.
    ///
    /// Fails with a header error if `reader` does not start with a valid
    /// GZIP header, including when it is empty.
    pub fn new(mut reader: R) -> Result<Self> {
        let (header, len) = GzipHeader::read_counted(&mut reader)?;
        Ok(Self {
            reader,
            header,
            inflate: Decompress::new(false),
            crc: Crc::new(),
            state: State::Body,
            verify_trailer: true,
            consumed: len as u64,
            decoded: 0,
            members: 1,
        })
    }

    /// Enable or disable CRC32/ISIZE verification of member trailers.
    ///
    /// Enabled by default. A short trailer is an error either way.
    pub fn verify_trailer(mut self, verify: bool) -> Self {
        self.verify_trailer = verify;
        self
    }

    /// Header of the first member.
    pub fn header(&self) -> &GzipHeader {
        &self.header
    }

    /// Number of members started so far.
    pub fn members(&self) -> usize {
        self.members
    }

    /// Compressed bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Decoded bytes produced so far.
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Whether the whole stream has been decoded.
    pub fn is_finished(&self) -> bool {
        self.state == State::Done
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume the decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Inflate into `buf`. Returns 0 only when the member body ended.
    fn read_body(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            let offset = self.consumed;
            let (consumed, produced, status, eof) = {
                let input = self.reader.fill_buf()?;
                let eof = input.is_empty();
                let before_in = self.inflate.total_in();
                let before_out = self.inflate.total_out();

                let status = self
                    .inflate
                    .decompress(input, buf, FlushDecompress::None)
                    .map_err(|e| {
                        SalvageError::corrupted(offset, format!("invalid deflate data: {}", e))
                    })?;

                (
                    (self.inflate.total_in() - before_in) as usize,
                    (self.inflate.total_out() - before_out) as usize,
                    status,
                    eof,
                )
            };

            self.reader.consume(consumed);
            self.consumed += consumed as u64;
            self.crc.update(&buf[..produced]);
            self.decoded += produced as u64;

            if status == Status::StreamEnd {
                self.state = State::Trailer;
                return Ok(produced);
            }
            if produced > 0 {
                return Ok(produced);
            }
            if eof {
                // Input is physically exhausted while the deflate stream
                // still expects more bits.
                return Err(SalvageError::truncated(self.consumed, self.decoded));
            }
            if consumed == 0 {
                return Err(SalvageError::corrupted(
                    self.consumed,
                    "inflate made no progress",
                ));
            }
        }
    }

    /// Read and check the trailer, then move on to the next member.
    fn finish_member(&mut self) -> Result<()> {
        let mut trailer = [0u8; TRAILER_LEN];
        let n = read_up_to(&mut self.reader, &mut trailer)?;
        self.consumed += n as u64;
        if n < TRAILER_LEN {
            return Err(SalvageError::truncated_trailer(self.consumed, n));
        }

        if self.verify_trailer {
            let expected_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
            let expected_size =
                u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);

            if self.crc.sum() != expected_crc {
                return Err(SalvageError::crc_mismatch(expected_crc, self.crc.sum()));
            }
            if self.crc.amount() != expected_size {
                return Err(SalvageError::size_mismatch(expected_size, self.crc.amount()));
            }
        }

        self.next_member()
    }

    fn next_member(&mut self) -> Result<()> {
        if self.reader.fill_buf()?.is_empty() {
            self.state = State::Done;
            return Ok(());
        }

        match GzipHeader::read_counted(&mut self.reader) {
            Ok((_, len)) => {
                self.consumed += len as u64;
                self.inflate.reset(false);
                self.crc.reset();
                self.members += 1;
                self.state = State::Body;
                Ok(())
            }
            Err(SalvageError::TruncatedHeader { read }) => {
                log::warn!(
                    "ignoring {} bytes of incomplete header after GZIP member {} at offset {}",
                    read,
                    self.members,
                    self.consumed
                );
                self.consumed += read as u64;
                self.state = State::Done;
                Ok(())
            }
            Err(SalvageError::InvalidMagic { .. }) => {
                log::warn!(
                    "ignoring trailing bytes after GZIP member {} at offset {}",
                    self.members,
                    self.consumed
                );
                self.state = State::Done;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl<R: BufRead> Read for GzipDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match self.state {
                State::Done => return Ok(0),
                State::Body => {
                    let n = self.read_body(buf)?;
                    if n > 0 {
                        return Ok(n);
                    }
                }
                State::Trailer => self.finish_member()?,
            }
        }
    }
}

impl<R: BufRead> std::fmt::Debug for GzipDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipDecoder")
            .field("header", &self.header)
            .field("state", &self.state)
            .field("consumed", &self.consumed)
            .field("decoded", &self.decoded)
            .field("members", &self.members)
            .finish()
    }
}
