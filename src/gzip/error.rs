//! Error types for gzip header parsing and payload decompression.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`GzipError::WrongMagic`] | not a gzip stream |
//! | [`GzipError::WrongCompressionMethod`] | gzip, but a method we cannot decode |
//! | [`GzipError::NonZeroReservedFlags`] | corrupt header or unknown format revision |
//! | [`GzipError::TruncatedHeader`] | header runs past the end of the buffer |
//! | [`GzipError::Decompression`] | corrupt or truncated payload |

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T, E = GzipError> = std::result::Result<T, E>;

/// Header field being read when the buffer ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Magic,
    Method,
    FixedHeader,
    ExtraLength,
    ExtraData,
    FileName,
    Comment,
    HeaderCrc,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Magic => "magic",
            HeaderField::Method => "compression method",
            HeaderField::FixedHeader => "fixed header",
            HeaderField::ExtraLength => "extra field length",
            HeaderField::ExtraData => "extra field",
            HeaderField::FileName => "file name",
            HeaderField::Comment => "comment",
            HeaderField::HeaderCrc => "header checksum",
        };
        f.write_str(name)
    }
}

/// Failure reported by a [`Decompressor`](super::Decompressor).
#[derive(Debug, Error)]
#[error("decompression failed: {0}")]
pub struct DecompressionError(#[from] pub io::Error);

#[derive(Debug, Error)]
pub enum GzipError {
    /// Carries the leading bytes that were checked (one or two).
    #[error("not a gzip stream (magic {0:02x?})")]
    WrongMagic(Vec<u8>),

    #[error("unsupported compression method: {0}")]
    WrongCompressionMethod(u8),

    #[error("reserved flag bits set: {0:#04x}")]
    NonZeroReservedFlags(u8),

    #[error("truncated header: {field} at offset {offset} runs past end of buffer ({len} bytes)")]
    TruncatedHeader {
        field: HeaderField,
        offset: usize,
        len: usize,
    },

    #[error(transparent)]
    Decompression(#[from] DecompressionError),
}
