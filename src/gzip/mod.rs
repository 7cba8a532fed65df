//! gzip container parsing and extraction.
//!
//! This module reads single-member gzip files (RFC 1952): it validates the
//! member header, locates the DEFLATE payload and hands it to a
//! [`Decompressor`].
//!
//! ## Architecture
//!
//! - [`structures`]: the parsed header ([`ContainerDescriptor`]) and its flag/OS types
//! - [`parser`]: bounds-checked header decoding from a byte slice
//! - [`extractor`]: [`ArchiveReader`] (in-memory) and [`GzipExtractor`] (any [`ReadAt`](crate::io::ReadAt) source)
//! - [`error`]: classified parse and decompression errors
//!
//! ## gzip Member Layout
//!
//! ```text
//! +---+---+----+-----+---+---+---+---+-----+----+
//! |ID1|ID2| CM | FLG |     MTIME     | XFL | OS |  fixed, 10 bytes
//! +---+---+----+-----+---+---+---+---+-----+----+
//! [XLEN(2) extra...] [name\0] [comment\0] [CRC16(2)]  optional, by FLG
//! compressed blocks...
//! CRC32(4) ISIZE(4)
//! ```
//!
//! ## Limitations
//!
//! - DEFLATE (method 8) only
//! - Extra field subfields are skipped, not decoded
//! - Header CRC16 and trailer CRC32/ISIZE are read but not verified
//! - Only the first member of a multi-member file is decoded
//! - The whole file is loaded into memory before parsing

mod error;
mod extractor;
mod parser;
mod structures;

pub use error::{DecompressionError, GzipError, HeaderField};
pub use extractor::{
    ArchiveReader, Decompressor, Deflate, GzipExtractor, unarchive, write_file,
};
pub use parser::{is_gzip, parse_header};
pub use structures::*;
