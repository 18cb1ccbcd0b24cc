//! Protocol codec
//!
//! Framing helpers over blocking `Read`/`Write` streams: 2-byte-length
//! UTF-8 strings for commands and statuses, 4-byte-length frames for blob
//! payloads, and the PUT payload convention (a decimal byte-count string
//! followed by the raw bytes).

use std::io::{Read, Write};

use crate::error::{FileHubError, Result};

/// Maximum accepted blob payload (64 MB)
pub const MAX_BLOB_SIZE: u32 = 64 * 1024 * 1024;

// =============================================================================
// Length-prefixed strings
// =============================================================================

/// Read one length-prefixed UTF-8 string (2-byte big-endian length)
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let mut len_buf = [0u8; 2];
    reader.read_exact(&mut len_buf)?;
    let len = u16::from_be_bytes(len_buf) as usize;

    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;

    String::from_utf8(bytes).map_err(|e| FileHubError::Protocol(format!("invalid UTF-8: {}", e)))
}

/// Write one length-prefixed UTF-8 string
pub fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    if s.len() > u16::MAX as usize {
        return Err(FileHubError::Protocol(format!(
            "string too long for frame: {} bytes (max {})",
            s.len(),
            u16::MAX
        )));
    }
    writer.write_all(&(s.len() as u16).to_be_bytes())?;
    writer.write_all(s.as_bytes())?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Blob frames (GET responses)
// =============================================================================

/// Read one blob frame (4-byte big-endian length + raw bytes)
pub fn read_blob<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);

    if len > MAX_BLOB_SIZE {
        return Err(FileHubError::Protocol(format!(
            "blob frame too large: {} bytes (max {})",
            len, MAX_BLOB_SIZE
        )));
    }

    let mut content = vec![0u8; len as usize];
    reader.read_exact(&mut content)?;
    Ok(content)
}

/// Write one blob frame
pub fn write_blob<W: Write>(writer: &mut W, content: &[u8]) -> Result<()> {
    if content.len() > MAX_BLOB_SIZE as usize {
        return Err(FileHubError::Protocol(format!(
            "blob too large: {} bytes (max {})",
            content.len(),
            MAX_BLOB_SIZE
        )));
    }
    writer.write_all(&(content.len() as u32).to_be_bytes())?;
    writer.write_all(content)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// PUT payloads
// =============================================================================

/// Read a PUT payload: a length-prefixed decimal byte-count string followed
/// by exactly that many raw bytes
pub fn read_put_payload<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let count_str = read_string(reader)?;
    let count: u32 = count_str.trim().parse().map_err(|_| {
        FileHubError::Protocol(format!("invalid payload byte count: {:?}", count_str))
    })?;

    if count > MAX_BLOB_SIZE {
        return Err(FileHubError::Protocol(format!(
            "payload too large: {} bytes (max {})",
            count, MAX_BLOB_SIZE
        )));
    }

    let mut content = vec![0u8; count as usize];
    reader.read_exact(&mut content)?;
    Ok(content)
}

/// Write a PUT payload (byte-count string, then raw bytes)
pub fn write_put_payload<W: Write>(writer: &mut W, content: &[u8]) -> Result<()> {
    if content.len() > MAX_BLOB_SIZE as usize {
        return Err(FileHubError::Protocol(format!(
            "payload too large: {} bytes (max {})",
            content.len(),
            MAX_BLOB_SIZE
        )));
    }
    write_string(writer, &content.len().to_string())?;
    writer.write_all(content)?;
    writer.flush()?;
    Ok(())
}
