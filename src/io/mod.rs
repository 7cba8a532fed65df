mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` completely from `offset`, issuing as many reads as needed
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;

        while filled < buf.len() {
            let n = self
                .read_at(offset + filled as u64, &mut buf[filled..])
                .await?;
            if n == 0 {
                bail!(
                    "Unexpected end of data at {} of {} bytes",
                    offset + filled as u64,
                    self.size()
                );
            }
            filled += n;
        }

        Ok(())
    }

    /// Read the whole source into one contiguous buffer
    async fn read_all(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.size() as usize];
        self.read_exact_at(0, &mut buf).await?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory source that hands out at most `chunk` bytes per read.
    struct Chunked {
        data: Vec<u8>,
        chunk: usize,
        claimed_size: u64,
    }

    #[async_trait]
    impl ReadAt for Chunked {
        async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
            let start = (offset as usize).min(self.data.len());
            let n = buf.len().min(self.chunk).min(self.data.len() - start);
            buf[..n].copy_from_slice(&self.data[start..start + n]);
            Ok(n)
        }

        fn size(&self) -> u64 {
            self.claimed_size
        }
    }

    #[tokio::test]
    async fn test_read_all_in_chunks() {
        let data: Vec<u8> = (0..=255).collect();
        let source = Chunked {
            claimed_size: data.len() as u64,
            data: data.clone(),
            chunk: 7,
        };
        assert_eq!(source.read_all().await.unwrap(), data);

        let mut middle = [0u8; 20];
        source.read_exact_at(100, &mut middle).await.unwrap();
        assert_eq!(&middle[..], &data[100..120]);
    }

    #[tokio::test]
    async fn test_read_all_short_source() {
        let source = Chunked {
            data: vec![1, 2, 3],
            chunk: 16,
            claimed_size: 10,
        };
        assert!(source.read_all().await.is_err());
    }
}
