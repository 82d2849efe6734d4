//! Random-access reads over a remote resource.
//!
//! [`RangeReader`] probes the resource once, then serves `read_at` calls from
//! a shared block cache, fetching any missing blocks with a single ranged GET
//! per call. It is `Send + Sync`; concurrent callers share the cache.

mod cursor;
mod logging;

pub use cursor::ReadAtCursor;
pub use logging::LoggingReader;

use std::num::NonZeroU64;
use std::sync::Arc;

use url::Url;

use crate::blocks::{missing_ranges, BlockCache, BlockLayout, DEFAULT_BLOCK_SIZE};
use crate::error::{Error, ProbeError, Result};
use crate::fetch::RangeFetcher;
use crate::http::HttpOptions;
use crate::probe::{self, HeadResult};

/// Positioned reads with no cursor state, safe to call from many threads.
pub trait ReadAt: Send + Sync {
    /// Read into `buf` starting at `offset`.
    ///
    /// Fills `buf` completely unless the resource ends first; returns 0 at or
    /// past the end. On error nothing is reported as read.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;

    /// Total size of the resource in bytes.
    fn size(&self) -> u64;
}

impl<R: ReadAt + ?Sized> ReadAt for &R {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

impl<R: ReadAt + ?Sized> ReadAt for Arc<R> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Options for opening a [`RangeReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    pub block_size: NonZeroU64,
    pub http: HttpOptions,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            block_size: NonZeroU64::new(DEFAULT_BLOCK_SIZE).unwrap_or(NonZeroU64::MIN),
            http: HttpOptions::default(),
        }
    }
}

/// Reader for one remote resource, backed by an unbounded block cache.
#[derive(Debug)]
pub struct RangeReader {
    url: Url,
    head: HeadResult,
    layout: BlockLayout,
    cache: BlockCache,
    fetcher: RangeFetcher,
}

impl RangeReader {
    /// Probe `url` with default options and open a reader for it.
    pub fn open(url: &str) -> Result<Self> {
        Self::open_with(url, ReaderOptions::default())
    }

    /// Probe `url` and open a reader for it.
    ///
    /// Fails with [`Error::ResourceNotFound`] on 404 and [`Error::Probe`] for
    /// invalid URLs or any other probe failure.
    pub fn open_with(url: &str, options: ReaderOptions) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| ProbeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let head = probe::probe(parsed.as_str(), &options.http)?;
        let size = head.size()?;
        if !head.accept_ranges {
            tracing::warn!(url = %parsed, "server does not advertise Accept-Ranges: bytes");
        }
        let reader = Self::from_parts(parsed, head, size, options);
        tracing::info!(
            url = %reader.url,
            size,
            block_size = reader.block_size(),
            blocks = reader.block_count(),
            "opened remote resource"
        );
        Ok(reader)
    }

    fn from_parts(url: Url, head: HeadResult, size: u64, options: ReaderOptions) -> Self {
        let fetcher = RangeFetcher::new(url.as_str(), options.http);
        Self {
            layout: BlockLayout::new(size, options.block_size),
            cache: BlockCache::new(),
            fetcher,
            head,
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resource size learned from the probe.
    pub fn size(&self) -> u64 {
        self.layout.size()
    }

    pub fn block_size(&self) -> u64 {
        self.layout.block_size()
    }

    /// Blocks the resource spans; the last one may be short.
    pub fn block_count(&self) -> u64 {
        self.layout.block_count()
    }

    /// Metadata returned by the construction-time HEAD probe.
    pub fn head(&self) -> &HeadResult {
        &self.head
    }

    /// Number of blocks currently cached.
    pub fn cached_blocks(&self) -> usize {
        self.cache.len()
    }

    /// Read into `buf` starting at `offset`; see [`ReadAt::read_at`].
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let size = self.layout.size();
        if buf.is_empty() || offset >= size {
            return Ok(0);
        }
        let len = (buf.len() as u64).min(size - offset);
        // len <= buf.len(), so the cast back is lossless.
        let buf = &mut buf[..len as usize];

        let blocks = self.layout.covering_blocks(offset, len);
        let missing = missing_ranges(&self.layout, blocks.clone(), &self.cache);
        tracing::debug!(
            offset,
            len,
            first_block = blocks.start,
            last_block = blocks.end - 1,
            missing = missing.len(),
            "read_at"
        );
        self.fetcher.fetch(&missing, &self.cache)?;

        self.copy_from_cache(buf, offset)
    }

    /// Copy `[offset, offset + buf.len())` out of the cache.
    ///
    /// Every covering block is checked before any byte is copied, so a
    /// missing block leaves `buf` untouched.
    fn copy_from_cache(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let block_size = self.layout.block_size();
        let view = self.cache.read();

        let blocks = self.layout.covering_blocks(offset, buf.len() as u64);
        if let Some(index) = blocks
            .clone()
            .find(|&i| view.get(i).map_or(true, |b| b.len() as u64 != self.layout.block_len(i)))
        {
            return Err(Error::MissingBlock { index });
        }

        let mut copied = 0usize;
        for index in blocks {
            let Some(block) = view.get(index) else {
                return Err(Error::MissingBlock { index });
            };
            let pos = offset + copied as u64;
            let within = (pos - index * block_size) as usize;
            let n = (buf.len() - copied).min(block.len() - within);
            buf[copied..copied + n].copy_from_slice(&block[within..within + n]);
            copied += n;
        }
        Ok(copied)
    }
}

impl ReadAt for RangeReader {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        RangeReader::read_at(self, buf, offset)
    }

    fn size(&self) -> u64 {
        RangeReader::size(self)
    }
}

/// In-memory `ReadAt` for exercising adapters without a network.
#[cfg(test)]
pub(crate) mod testing {
    use super::ReadAt;
    use crate::error::{Error, Result};

    pub(crate) struct MemReader {
        pub data: Vec<u8>,
        pub fail_at: Option<u64>,
    }

    impl MemReader {
        pub(crate) fn new(data: Vec<u8>) -> Self {
            Self {
                data,
                fail_at: None,
            }
        }
    }

    impl ReadAt for MemReader {
        fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
            if self.fail_at == Some(offset) {
                return Err(Error::MissingBlock { index: 0 });
            }
            let start = (offset as usize).min(self.data.len());
            let n = buf.len().min(self.data.len() - start);
            buf[..n].copy_from_slice(&self.data[start..start + n]);
            Ok(n)
        }

        fn size(&self) -> u64 {
            self.data.len() as u64
        }
    }
}
