//! Info command implementation.

use super::CommandResult;
use crate::utils::ExitStatus;
use gzsalvage::Outcome;
use gzsalvage_gzip::GzipHeader;
use gzsalvage_gzip::header::flags;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON form of the `info` output.
#[derive(Debug, Serialize)]
struct InfoJson<'a> {
    file: String,
    size: u64,
    header_size: usize,
    method: u8,
    flags: u8,
    mtime: u32,
    xfl: u8,
    os: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_len: Option<usize>,
    health: &'a Outcome,
}

pub fn cmd_info(file: &Path, json: bool) -> CommandResult {
    let metadata = std::fs::metadata(file)?;
    let mut reader = BufReader::new(File::open(file)?);
    let (header, header_size) = GzipHeader::read_counted(&mut reader)?;
    let health = gzsalvage::verify(file);

    if json {
        let output = InfoJson {
            file: file.display().to_string(),
            size: metadata.len(),
            header_size,
            method: header.method,
            flags: header.flags,
            mtime: header.mtime,
            xfl: header.xfl,
            os: header.os_name(),
            filename: header.filename.as_deref(),
            comment: header.comment.as_deref(),
            extra_len: header.extra.as_ref().map(Vec::len),
            health: &health,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitStatus::from(&health));
    }

    println!("GZIP Information");
    println!("================");
    println!("File: {}", file.display());
    println!("Size: {} bytes", metadata.len());
    println!();
    println!("Header ({} bytes):", header_size);
    println!("  Method: {} (deflate)", header.method);
    println!("  Flags: {:#04x}{}", header.flags, describe_flags(header.flags));
    if header.mtime > 0 {
        println!("  Modification time: {} (Unix timestamp)", header.mtime);
    }
    println!("  Extra flags: {}", header.xfl);
    println!("  OS: {} ({})", header.os_name(), header.os);
    if let Some(name) = &header.filename {
        println!("  Original filename: {}", name);
    }
    if let Some(comment) = &header.comment {
        println!("  Comment: {}", comment);
    }
    if let Some(extra) = &header.extra {
        println!("  Extra field: {} bytes", extra.len());
    }
    println!();
    println!("Health: {}", health);

    Ok(ExitStatus::from(&health))
}

fn describe_flags(value: u8) -> String {
    let names: Vec<&str> = [
        (flags::FTEXT, "FTEXT"),
        (flags::FHCRC, "FHCRC"),
        (flags::FEXTRA, "FEXTRA"),
        (flags::FNAME, "FNAME"),
        (flags::FCOMMENT, "FCOMMENT"),
    ]
    .iter()
    .filter(|(bit, _)| value & bit != 0)
    .map(|&(_, name)| name)
    .collect();

    if names.is_empty() {
        String::new()
    } else {
        format!(" ({})", names.join(" | "))
    }
}
