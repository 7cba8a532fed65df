use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use flate2::read::DeflateDecoder;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::io::ReadAt;

use super::error::{self, DecompressionError, GzipError};
use super::parser::parse_header;
use super::structures::ContainerDescriptor;

/// Turns a compressed payload back into the original bytes.
pub trait Decompressor {
    fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>, DecompressionError>;
}

/// Raw DEFLATE (RFC 1951) decoder backed by flate2.
///
/// Decoding stops at the final DEFLATE block, so the 8-byte gzip trailer
/// following it is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflate;

impl Decompressor for Deflate {
    fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>, DecompressionError> {
        let mut out = Vec::new();
        DeflateDecoder::new(payload).read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Header parsing plus payload decompression over an in-memory gzip member.
///
/// The trailer (CRC32 and ISIZE) is not checked against the output.
#[derive(Debug, Clone, Default)]
pub struct ArchiveReader<D: Decompressor = Deflate> {
    decompressor: D,
}

impl ArchiveReader<Deflate> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Decompressor> ArchiveReader<D> {
    pub fn with_decompressor(decompressor: D) -> Self {
        Self { decompressor }
    }

    /// Parse only the header of `buf`.
    pub fn read_header(&self, buf: &[u8]) -> error::Result<ContainerDescriptor> {
        parse_header(buf)
    }

    /// Parse the header of `buf` and decompress everything after it.
    ///
    /// Header errors are returned before the decompressor is called.
    /// Decompressor errors are returned as [`GzipError::Decompression`](super::GzipError::Decompression).
    pub fn unarchive(&self, buf: &[u8]) -> error::Result<Vec<u8>> {
        let header = parse_header(buf)?;
        let payload = header.payload(buf);
        debug!(offset = header.payload_offset, len = payload.len(), "decompressing payload");
        Ok(self.decompressor.decompress(payload)?)
    }
}

/// Decompress an in-memory gzip member with the DEFLATE decoder.
pub fn unarchive(buf: &[u8]) -> error::Result<Vec<u8>> {
    ArchiveReader::new().unarchive(buf)
}

/// Bytes fetched up front when only the header is wanted; doubled while
/// the header turns out to be longer.
const HEADER_PREFIX: usize = 4096;

/// gzip file extractor
///
/// Each method reads the source at most once.
pub struct GzipExtractor<R: ReadAt> {
    reader: Arc<R>,
    archive: ArchiveReader,
}

impl<R: ReadAt> GzipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            archive: ArchiveReader::new(),
        }
    }

    /// Parse the header from a prefix of the source.
    ///
    /// Starts with [`HEADER_PREFIX`] bytes and extends the prefix only while
    /// the header runs past it, so long payloads are never fetched.
    pub async fn header(&self) -> Result<ContainerDescriptor> {
        let size = self.reader.size() as usize;
        let mut buf = Vec::new();
        let mut want = HEADER_PREFIX.min(size);

        loop {
            let start = buf.len();
            buf.resize(want, 0);
            self.reader
                .read_exact_at(start as u64, &mut buf[start..])
                .await?;

            match self.archive.read_header(&buf) {
                Err(GzipError::TruncatedHeader { .. }) if want < size => {
                    debug!(prefix = want, size, "header longer than prefix, reading more");
                    want = want.saturating_mul(2).min(size);
                }
                result => return Ok(result?),
            }
        }
    }

    /// Read the source once, returning its header and decompressed data
    pub async fn extract(&self) -> Result<(ContainerDescriptor, Vec<u8>)> {
        let buf = self.reader.read_all().await?;
        let header = self.archive.read_header(&buf)?;
        let data = self.archive.unarchive(&buf)?;
        Ok((header, data))
    }

    /// Extract file data to memory
    pub async fn extract_to_memory(&self) -> Result<Vec<u8>> {
        let buf = self.reader.read_all().await?;
        Ok(self.archive.unarchive(&buf)?)
    }

    /// Extract file to disk
    pub async fn extract_to_file(&self, output_path: &Path) -> Result<()> {
        let data = self.extract_to_memory().await?;
        write_file(output_path, &data).await
    }

    /// Extract file to stdout
    pub async fn extract_to_stdout(&self) -> Result<()> {
        let data = self.extract_to_memory().await?;

        let mut stdout = tokio::io::stdout();
        stdout.write_all(&data).await?;
        stdout.flush().await?;

        Ok(())
    }
}

/// Write `data` to `output_path`, creating parent directories as needed
pub async fn write_file(output_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(output_path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(())
}
