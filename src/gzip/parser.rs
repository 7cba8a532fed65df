//! gzip member header parser.
//!
//! This module decodes the header that precedes the DEFLATE payload of a
//! gzip member and computes where that payload starts.
//!
//! ## Parsing Strategy
//!
//! The header is read in one forward pass over an immutable buffer:
//! 1. Fixed 10-byte header. Magic and method are checked before anything else.
//! 2. Reserved flag bits must be clear.
//! 3. Optional fields, strictly in wire order: extra, name, comment, header CRC.
//!
//! Every step takes the current offset and returns the next one together
//! with whatever it extracted. Nothing is assembled until all steps have
//! succeeded, so a failing step never leaves a half-built descriptor behind.
//! Every read is bounds checked and reports [`GzipError::TruncatedHeader`]
//! instead of indexing past the end of the buffer.

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace};

use super::error::{GzipError, HeaderField, Result};
use super::structures::*;

/// Fields of the fixed part of the header, before any optional field.
struct FixedHeader {
    magic: [u8; 2],
    method: CompressionMethod,
    flags: FlagBits,
    mtime: u64,
    extra_flags: u8,
    os_type: u8,
}

/// Check whether `buf` starts with the gzip magic bytes.
pub fn is_gzip(buf: &[u8]) -> bool {
    buf.starts_with(&GZIP_MAGIC)
}

/// Parse the gzip member header at the start of `buf`.
///
/// # Returns
///
/// The parsed [`ContainerDescriptor`]; its `payload_offset` is the index
/// of the first compressed byte and never exceeds `buf.len()`.
///
/// # Errors
///
/// - [`GzipError::WrongMagic`] if `buf` does not start with `1f 8b`
/// - [`GzipError::WrongCompressionMethod`] if the method is not DEFLATE
/// - [`GzipError::NonZeroReservedFlags`] if any of flag bits 5-7 is set
/// - [`GzipError::TruncatedHeader`] if the header runs past the end of `buf`
pub fn parse_header(buf: &[u8]) -> Result<ContainerDescriptor> {
    let (offset, fixed) = read_fixed_header(buf)?;
    check_reserved_flags(fixed.flags)?;

    let flags = fixed.flags;
    let (offset, extra_field_len) = optional(flags.has_extra(), offset, |at| skip_extra(buf, at))?;
    let (offset, file_name) = optional(flags.has_name(), offset, |at| {
        read_zero_terminated(buf, at, HeaderField::FileName)
    })?;
    let (offset, comment) = optional(flags.has_comment(), offset, |at| {
        read_zero_terminated(buf, at, HeaderField::Comment)
    })?;
    let (offset, header_checksum) =
        optional(flags.has_header_crc(), offset, |at| read_header_crc(buf, at))?;

    debug!(payload_offset = offset, len = buf.len(), "parsed gzip header");

    Ok(ContainerDescriptor {
        magic: fixed.magic,
        compression_method: fixed.method,
        flags,
        modification_time: fixed.mtime,
        extra_flags: fixed.extra_flags,
        os_type: fixed.os_type,
        extra_field_len,
        file_name,
        comment,
        header_checksum: header_checksum.unwrap_or(0),
        payload_offset: offset,
    })
}

/// Borrow `len` bytes at `offset`, or fail with a truncation error for `field`.
fn take(buf: &[u8], offset: usize, len: usize, field: HeaderField) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or(GzipError::TruncatedHeader {
            field,
            offset,
            len: buf.len(),
        })
}

/// Run `step` at `offset` only when `present`; otherwise the offset is unchanged.
fn optional<T>(
    present: bool,
    offset: usize,
    step: impl FnOnce(usize) -> Result<(usize, T)>,
) -> Result<(usize, Option<T>)> {
    if !present {
        return Ok((offset, None));
    }
    let (next, value) = step(offset)?;
    debug_assert!(next >= offset);
    Ok((next, Some(value)))
}

fn read_fixed_header(buf: &[u8]) -> Result<(usize, FixedHeader)> {
    // A lone first byte is enough to rule gzip out.
    let head = &buf[..buf.len().min(GZIP_MAGIC.len())];
    if !GZIP_MAGIC.starts_with(head) {
        return Err(GzipError::WrongMagic(head.to_vec()));
    }
    let magic = take(buf, 0, 2, HeaderField::Magic)?;
    let magic = [magic[0], magic[1]];

    let method = take(buf, 2, 1, HeaderField::Method)?[0];
    let method = CompressionMethod::from_u8(method);
    if method != CompressionMethod::Deflate {
        return Err(GzipError::WrongCompressionMethod(method.as_u8()));
    }

    // flags(1) mtime(4) xfl(1) os(1)
    let rest = take(buf, 3, FIXED_HEADER_SIZE - 3, HeaderField::FixedHeader)?;
    let fixed = FixedHeader {
        magic,
        method,
        flags: FlagBits(rest[0]),
        mtime: LittleEndian::read_u32(&rest[1..5]) as u64,
        extra_flags: rest[5],
        os_type: rest[6],
    };

    trace!(
        flags = fixed.flags.bits(),
        mtime = fixed.mtime,
        xfl = fixed.extra_flags,
        os = fixed.os_type,
        "read fixed gzip header"
    );

    Ok((FIXED_HEADER_SIZE, fixed))
}

fn check_reserved_flags(flags: FlagBits) -> Result<()> {
    match flags.reserved() {
        0 => Ok(()),
        _ => Err(GzipError::NonZeroReservedFlags(flags.bits())),
    }
}

/// Skip the extra field. Its subfields are not interpreted.
fn skip_extra(buf: &[u8], offset: usize) -> Result<(usize, u16)> {
    let xlen = LittleEndian::read_u16(take(buf, offset, 2, HeaderField::ExtraLength)?);
    let data_start = offset + 2;
    take(buf, data_start, xlen as usize, HeaderField::ExtraData)?;

    debug!(offset, xlen, "skipped gzip extra field");
    Ok((data_start + xlen as usize, xlen))
}

/// Read a zero-terminated string starting at `offset`.
///
/// Returns the offset just past the terminator. Bytes that are not valid
/// UTF-8 decode to an empty string.
fn read_zero_terminated(buf: &[u8], offset: usize, field: HeaderField) -> Result<(usize, String)> {
    let truncated = || GzipError::TruncatedHeader {
        field,
        offset,
        len: buf.len(),
    };
    let tail = buf.get(offset..).ok_or_else(truncated)?;
    let nul = tail.iter().position(|&b| b == 0).ok_or_else(truncated)?;

    let text = match std::str::from_utf8(&tail[..nul]) {
        Ok(s) => s.to_owned(),
        Err(e) => {
            debug!(%field, offset, error = %e, "header text is not UTF-8, using empty string");
            String::new()
        }
    };

    debug!(%field, offset, value = %text, "read gzip header string");
    Ok((offset + nul + 1, text))
}

fn read_header_crc(buf: &[u8], offset: usize) -> Result<(usize, u16)> {
    let crc = LittleEndian::read_u16(take(buf, offset, 2, HeaderField::HeaderCrc)?);
    debug!(offset, crc, "read gzip header checksum");
    Ok((offset + 2, crc))
}
