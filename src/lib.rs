//! # rungz
//!
//! A Rust gunzip utility with HTTP URL support.
//!
//! This library parses gzip containers (RFC 1952), reports their header
//! metadata and decompresses the payload. Sources can be local files or
//! HTTP/HTTPS URLs fetched with Range requests.
//!
//! ## Features
//!
//! - Strict, bounds-checked gzip header parsing with classified errors
//! - Optional header fields: extra field, original file name, comment, header CRC16
//! - DEFLATE payload decompression, or any custom [`Decompressor`]
//! - Local files and HTTP/HTTPS URLs as sources
//!
//! ## Example
//!
//! ```
//! use rungz::{parse_header, unarchive, GzipError};
//!
//! let mut gz = vec![31, 139, 8, 0, 0, 0, 0, 0, 0, 255];
//! gz.extend_from_slice(&[0x73, 0x74, 0x72, 0x06, 0x00]);
//!
//! assert_eq!(parse_header(&gz)?.payload_offset, 10);
//! assert_eq!(unarchive(&gz)?, b"ABC");
//! # Ok::<(), GzipError>(())
//! ```

pub mod cli;
pub mod gzip;
pub mod io;

pub use cli::Cli;
pub use gzip::{
    ArchiveReader, ContainerDescriptor, Decompressor, Deflate, GzipError, GzipExtractor,
    parse_header, unarchive,
};
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
