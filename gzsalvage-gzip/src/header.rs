//! GZIP header parsing and writing.

use gzsalvage_core::error::{Result, SalvageError};
use std::io::{self, ErrorKind, Read, Write};

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// Size of the fixed part of a GZIP header.
pub const FIXED_HEADER_LEN: usize = 10;

/// Size of a GZIP member trailer (CRC32 + ISIZE).
pub const TRAILER_LEN: usize = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// GZIP member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (8 for DEFLATE).
    pub method: u8,
    /// Flags.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Extra field (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set).
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set).
    pub comment: Option<String>,
    /// Header CRC16 (if FHCRC flag set).
    pub header_crc: Option<u16>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            method: CM_DEFLATE,
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: 255, // Unknown OS
            extra: None,
            filename: None,
            comment: None,
            header_crc: None,
        }
    }
}

impl GzipHeader {
    /// Create a new GZIP header with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable name of the OS field.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            0 => "FAT",
            1 => "Amiga",
            2 => "VMS",
            3 => "Unix",
            4 => "VM/CMS",
            5 => "Atari TOS",
            6 => "HPFS",
            7 => "Macintosh",
            8 => "Z-System",
            9 => "CP/M",
            10 => "TOPS-20",
            11 => "NTFS",
            12 => "QDOS",
            13 => "Acorn RISCOS",
            _ => "unknown",
        }
    }

    /// Write the header to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut flags = self.flags & flags::FTEXT;
        if self.extra.is_some() {
            flags |= flags::FEXTRA;
        }
        if self.filename.is_some() {
            flags |= flags::FNAME;
        }
        if self.comment.is_some() {
            flags |= flags::FCOMMENT;
        }

        let mut fixed = [0u8; FIXED_HEADER_LEN];
        fixed[..2].copy_from_slice(&GZIP_MAGIC);
        fixed[2] = self.method;
        fixed[3] = flags;
        fixed[4..8].copy_from_slice(&self.mtime.to_le_bytes());
        fixed[8] = self.xfl;
        fixed[9] = self.os;
        writer.write_all(&fixed)?;

        if let Some(ref extra) = self.extra {
            let xlen = u16::try_from(extra.len())
                .map_err(|_| SalvageError::invalid_header("extra field longer than 65535 bytes"))?;
            writer.write_all(&xlen.to_le_bytes())?;
            writer.write_all(extra)?;
        }

        if let Some(ref filename) = self.filename {
            writer.write_all(filename.as_bytes())?;
            writer.write_all(&[0])?;
        }

        if let Some(ref comment) = self.comment {
            writer.write_all(comment.as_bytes())?;
            writer.write_all(&[0])?;
        }

        Ok(())
    }

    /// Read a GZIP header from a reader.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_counted(reader).map(|(header, _)| header)
    }

    /// Read a GZIP header, also returning how many bytes it occupied.
    pub fn read_counted<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let mut input = CountingReader { inner: reader, read: 0 };

        let mut magic = [0u8; 2];
        let n = input.read_up_to(&mut magic)?;
        if n < magic.len() {
            // A lone 0x1F may be the start of a header cut short.
            if n == 1 && magic[0] != GZIP_MAGIC[0] {
                return Err(SalvageError::invalid_magic(GZIP_MAGIC, &magic[..1]));
            }
            return Err(SalvageError::truncated_header(n));
        }
        if magic != GZIP_MAGIC {
            return Err(SalvageError::invalid_magic(GZIP_MAGIC, magic));
        }

        let mut buf = [0u8; FIXED_HEADER_LEN - 2];
        input.fill(&mut buf)?;

        let method = buf[0];
        if method != CM_DEFLATE {
            return Err(SalvageError::unsupported_method(format!(
                "GZIP method {}",
                method
            )));
        }

        let flags = buf[1];
        if flags & flags::RESERVED != 0 {
            return Err(SalvageError::invalid_header(format!(
                "reserved flag bits set: {:#04x}",
                flags
            )));
        }

        let mtime = u32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]);
        let xfl = buf[6];
        let os = buf[7];

        let mut extra = None;
        let mut filename = None;
        let mut comment = None;
        let mut header_crc = None;

        if flags & flags::FEXTRA != 0 {
            let mut xlen_buf = [0u8; 2];
            input.fill(&mut xlen_buf)?;
            let xlen = u16::from_le_bytes(xlen_buf) as usize;
            let mut field = vec![0u8; xlen];
            input.fill(&mut field)?;
            extra = Some(field);
        }

        if flags & flags::FNAME != 0 {
            filename = Some(input.read_null_terminated()?);
        }

        if flags & flags::FCOMMENT != 0 {
            comment = Some(input.read_null_terminated()?);
        }

        if flags & flags::FHCRC != 0 {
            let mut crc_buf = [0u8; 2];
            input.fill(&mut crc_buf)?;
            header_crc = Some(u16::from_le_bytes(crc_buf));
        }

        let header = Self {
            method,
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
        };

        Ok((header, input.read))
    }
}

/// Read until `buf` is full or input ends; returns bytes read.
pub(crate) fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reader wrapper that knows how many header bytes it has consumed, so a
/// short read can be reported as a truncated header.
struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    read: usize,
}

impl<R: Read> CountingReader<'_, R> {
    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let filled = read_up_to(&mut *self.inner, buf)?;
        self.read += filled;
        Ok(filled)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.read_up_to(buf)? < buf.len() {
            return Err(SalvageError::truncated_header(self.read));
        }
        Ok(())
    }

    fn read_null_terminated(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        let mut buf = [0u8; 1];

        loop {
            self.fill(&mut buf)?;
            if buf[0] == 0 {
                break;
            }
            bytes.push(buf[0]);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
